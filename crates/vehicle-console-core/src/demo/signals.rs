//! Signal generators
//!
//! Closed-form periodic functions of drive mode and elapsed simulated time.
//! No state and no randomness: the same `(mode, t)` always yields the same
//! readings. Operand order mirrors the published formulas so formatted output
//! is reproducible digit for digit.

use crate::telemetry::{DriveMode, ImuReading};

/// Signed vehicle speed in mph (negative while reversing)
pub fn signed_speed(mode: DriveMode, t: f64) -> f64 {
    match mode {
        DriveMode::Drive => 32.0 + t.sin() * 8.0,
        DriveMode::Reverse => -5.0 + (t * 1.3).sin(),
        DriveMode::Park => (t * 0.2).sin() * 0.5,
    }
}

/// Torque demand as a fraction of peak, zero in Park
pub fn torque_ratio(mode: DriveMode, t: f64) -> f64 {
    let omega = match mode {
        DriveMode::Park => return 0.0,
        DriveMode::Reverse => 0.6,
        DriveMode::Drive => 0.8,
    };
    0.35 + 0.25 * (t * omega).sin().abs()
}

/// Headline state of charge in percent
pub fn battery_pct(t: f64) -> f64 {
    78.0 + (t * 0.04).sin() * 3.0
}

/// Vehicle attitude; yaw sweeps continuously and wraps at 360°
pub fn imu(t: f64) -> ImuReading {
    ImuReading {
        pitch: (t * 0.45).sin() * 9.0,
        roll: (t * 0.35).cos() * 7.0,
        yaw: (t * 22.0) % 360.0,
    }
}

/// Every scalar behind the raw section fields at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelReadings {
    // Battery pack
    pub pack_voltage: f64,
    pub pack_current: f64,
    pub module_delta: f64,
    pub coolant_in: f64,
    pub coolant_out: f64,
    pub heater_duty: f64,
    pub hv_isolation: f64,
    pub charge_rate: f64,

    // Powertrain
    pub front_torque: f64,
    pub rear_torque: f64,
    pub inverter_temp: f64,
    pub dc_dc_load: f64,
    pub regen_limit: f64,
    pub gearbox_temp: f64,
    pub clutch_slip: f64,

    // Chassis
    pub yaw_rate: f64,
    pub pitch_rate: f64,
    pub roll_rate: f64,
    pub suspension_fl: f64,
    pub suspension_fr: f64,
    pub suspension_rl: f64,
    pub suspension_rr: f64,
    pub brake_temp: f64,
    pub steering_angle: f64,

    // Thermal
    pub cabin_setpoint: f64,
    pub cabin_temp: f64,
    pub radiator_fan: f64,
    pub compressor_speed: f64,
    pub ambient: f64,
}

impl ChannelReadings {
    /// Generate all channel readings for torque ratio `torque` at time `t`
    pub fn generate(torque: f64, t: f64) -> Self {
        let coolant_in = 32.0 + (t * 0.3).sin() * 3.0;
        // Shared ride height that the four corners oscillate around
        let suspension = 110.0 + (t * 0.9).sin() * 5.0;

        Self {
            pack_voltage: 780.0 + (t * 0.25).sin() * 14.0,
            pack_current: torque * 420.0,
            module_delta: 1.5 + (t * 0.2).sin(),
            coolant_in,
            coolant_out: coolant_in + 5.0 + (t * 0.6).sin(),
            heater_duty: (t * 0.4).sin() * 15.0 + 20.0,
            hv_isolation: 4.8 + (t * 0.5).sin() * 0.2,
            charge_rate: (t * 0.3).sin().max(0.0) * 150.0,

            front_torque: torque * 320.0,
            rear_torque: torque * 360.0,
            inverter_temp: 48.0 + (t * 0.5).sin() * 6.0,
            dc_dc_load: (t * 0.2).sin() * 0.8 + 1.6,
            regen_limit: torque * 210.0,
            gearbox_temp: 80.0 + (t * 0.25).sin() * 4.0,
            clutch_slip: (t * 0.8).sin().abs() * 1.8,

            yaw_rate: (t * 0.9).sin() * 6.0,
            pitch_rate: (t * 0.7).cos() * 3.0,
            roll_rate: (t * 0.4).sin() * 2.0,
            suspension_fl: suspension + t.sin(),
            suspension_fr: suspension + t.cos(),
            suspension_rl: suspension + (t * 1.3).sin(),
            suspension_rr: suspension + (t * 1.1).cos(),
            brake_temp: 220.0 + t.sin().abs() * 40.0,
            steering_angle: (t * 0.6).sin() * 14.0,

            cabin_setpoint: 20.0 + (t * 0.1).sin(),
            cabin_temp: 19.5 + (t * 0.05).sin(),
            radiator_fan: (t * 0.9).sin() * 30.0 + 60.0,
            compressor_speed: (t * 0.7).sin().abs() * 7000.0,
            ambient: 12.0 + (t * 0.02).sin() * 6.0,
        }
    }
}
