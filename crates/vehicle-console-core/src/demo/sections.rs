//! Raw section builder
//!
//! Groups generator outputs into the four labelled sections shown on the raw
//! data tab. Field order, labels, units and decimal places are fixed.

use super::signals::ChannelReadings;
use crate::telemetry::{to_fixed, DriveMode, VehicleField, VehicleSection};

/// Section ids in display order
pub const SECTION_IDS: [&str; 4] = ["battery-pack", "powertrain", "chassis", "thermal"];

/// Torque ratio above which the HV contactors are reported closed
pub const CONTACTOR_CLOSED_TORQUE: f64 = 0.05;

/// Torque ratio above which the heat pump switches to cooling
pub const HEAT_PUMP_COOLING_TORQUE: f64 = 0.2;

/// Battery level below which the pack heater runs
pub const BATTERY_HEATER_THRESHOLD_PCT: f64 = 65.0;

/// Build the raw sections for one tick
pub fn build_sections(
    mode: DriveMode,
    speed: f64,
    torque: f64,
    battery: f64,
    t: f64,
) -> Vec<VehicleSection> {
    let ch = ChannelReadings::generate(torque, t);

    vec![
        VehicleSection::new(
            "battery-pack",
            "Battery Pack",
            vec![
                VehicleField::new("State of Charge", to_fixed(battery, 1), "%"),
                VehicleField::new("Pack Voltage", to_fixed(ch.pack_voltage, 0), "V"),
                VehicleField::new("Pack Current", to_fixed(ch.pack_current, 0), "A"),
                VehicleField::new("Module Δ", to_fixed(ch.module_delta, 2), "°C"),
                VehicleField::new("Coolant Inlet", to_fixed(ch.coolant_in, 1), "°C"),
                VehicleField::new("Coolant Outlet", to_fixed(ch.coolant_out, 1), "°C"),
                VehicleField::new("Heater Duty", to_fixed(ch.heater_duty, 0), "%"),
                VehicleField::new("Isolation", to_fixed(ch.hv_isolation, 2), "kΩ"),
                VehicleField::unitless(
                    "Contactor State",
                    if torque > CONTACTOR_CLOSED_TORQUE { "Closed" } else { "Open" },
                ),
                VehicleField::new("Charge Rate", to_fixed(ch.charge_rate, 0), "kW"),
            ],
        ),
        VehicleSection::new(
            "powertrain",
            "Powertrain",
            vec![
                VehicleField::new("Vehicle Speed", to_fixed(speed, 1), "mph"),
                VehicleField::new("Front Torque", to_fixed(ch.front_torque, 0), "Nm"),
                VehicleField::new("Rear Torque", to_fixed(ch.rear_torque, 0), "Nm"),
                VehicleField::new("Inverter Temp", to_fixed(ch.inverter_temp, 1), "°C"),
                VehicleField::new("DC/DC Load", to_fixed(ch.dc_dc_load, 2), "kW"),
                VehicleField::new("Regen Limit", to_fixed(ch.regen_limit, 0), "Nm"),
                VehicleField::new("Gearbox Temp", to_fixed(ch.gearbox_temp, 1), "°C"),
                VehicleField::new("Clutch Slip", to_fixed(ch.clutch_slip, 2), "%"),
                VehicleField::unitless("Drive Mode", mode.code()),
            ],
        ),
        VehicleSection::new(
            "chassis",
            "Chassis & Dynamics",
            vec![
                VehicleField::new("Yaw Rate", to_fixed(ch.yaw_rate, 2), "°/s"),
                VehicleField::new("Pitch Rate", to_fixed(ch.pitch_rate, 2), "°/s"),
                VehicleField::new("Roll Rate", to_fixed(ch.roll_rate, 2), "°/s"),
                VehicleField::new("Suspension FL", to_fixed(ch.suspension_fl, 0), "mm"),
                VehicleField::new("Suspension FR", to_fixed(ch.suspension_fr, 0), "mm"),
                VehicleField::new("Suspension RL", to_fixed(ch.suspension_rl, 0), "mm"),
                VehicleField::new("Suspension RR", to_fixed(ch.suspension_rr, 0), "mm"),
                VehicleField::new("Brake Temp", to_fixed(ch.brake_temp, 0), "°C"),
                VehicleField::new("Steering Angle", to_fixed(ch.steering_angle, 1), "°"),
            ],
        ),
        VehicleSection::new(
            "thermal",
            "Thermal Systems",
            vec![
                VehicleField::new("Cabin Setpoint", to_fixed(ch.cabin_setpoint, 1), "°C"),
                VehicleField::new("Cabin Temp", to_fixed(ch.cabin_temp, 1), "°C"),
                VehicleField::unitless(
                    "Heat Pump Mode",
                    if torque > HEAT_PUMP_COOLING_TORQUE { "Cooling" } else { "Heating" },
                ),
                VehicleField::new("Radiator Fan", to_fixed(ch.radiator_fan, 0), "%"),
                VehicleField::unitless(
                    "Battery Heater",
                    if battery < BATTERY_HEATER_THRESHOLD_PCT { "On" } else { "Off" },
                ),
                VehicleField::new("Compressor Speed", to_fixed(ch.compressor_speed, 0), "rpm"),
                VehicleField::new("Ambient", to_fixed(ch.ambient, 1), "°C"),
            ],
        ),
    ]
}
