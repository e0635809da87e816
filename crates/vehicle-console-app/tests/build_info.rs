//! Build information tests
//!
//! The build ID is stamped at compile time as `YYYY.MM.DD+g<short-sha>`, or
//! `unknown` when git is not available.

use vehicle_console_app_lib::BUILD_ID;

#[test]
fn test_build_id_format() {
    println!("Build ID: {}", BUILD_ID);

    if BUILD_ID == "unknown" {
        return;
    }

    let (date_part, git_part) = BUILD_ID
        .split_once('+')
        .expect("Build ID should have date and git parts separated by +");

    let date_pieces: Vec<&str> = date_part.split('.').collect();
    assert_eq!(date_pieces.len(), 3, "Date should be YYYY.MM.DD");
    assert_eq!(date_pieces[0].len(), 4, "Year should be 4 digits");
    date_pieces[0]
        .parse::<u16>()
        .expect("Year should be valid number");

    assert_eq!(date_pieces[1].len(), 2, "Month should be 2 digits");
    let month: u8 = date_pieces[1].parse().expect("Month should be valid number");
    assert!((1..=12).contains(&month), "Month should be 01-12");

    assert_eq!(date_pieces[2].len(), 2, "Day should be 2 digits");
    let day: u8 = date_pieces[2].parse().expect("Day should be valid number");
    assert!((1..=31).contains(&day), "Day should be 01-31");

    let sha = git_part
        .strip_prefix('g')
        .expect("Git part should start with 'g'");
    assert!(!sha.is_empty(), "Short SHA should not be empty");
    assert!(
        sha.chars().all(|c| c.is_ascii_hexdigit()),
        "Short SHA should contain only hex characters"
    );
}

#[test]
fn test_build_id_not_empty() {
    assert!(!BUILD_ID.is_empty(), "Build ID should not be empty");
}
