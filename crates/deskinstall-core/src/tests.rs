use std::cmp::Ordering;
use std::path::PathBuf;

use chrono::{TimeZone, Utc};

use super::*;

#[test]
fn compare_versions_orders_components_numerically() {
    assert_eq!(compare_versions("1.2.0", "1.10.0"), Ordering::Less);
    assert_eq!(compare_versions("1.10.0", "1.2.0"), Ordering::Greater);
}

#[test]
fn compare_versions_pads_shorter_version_with_zeros() {
    assert_eq!(compare_versions("2.0", "2.0.0"), Ordering::Equal);
    assert_eq!(compare_versions("3.1", "3"), Ordering::Greater);
    assert_eq!(compare_versions("3", "3.0.1"), Ordering::Less);
}

#[test]
fn compare_versions_is_antisymmetric() {
    let samples = ["1", "1.0.1", "1.2", "1.10", "2.0.0", "0.9.9", "10"];
    for left in samples {
        for right in samples {
            assert_eq!(
                compare_versions(left, right),
                compare_versions(right, left).reverse(),
                "{left} vs {right}"
            );
        }
    }
}

#[test]
fn compare_versions_treats_non_numeric_components_as_zero() {
    assert_eq!(compare_versions("1.beta", "1.0"), Ordering::Equal);
    assert_eq!(compare_versions("1.2-rc1", "1.0"), Ordering::Equal);
    assert_eq!(compare_versions("", "0.0"), Ordering::Equal);
    assert_eq!(compare_versions("abc", "0.1"), Ordering::Less);
}

#[test]
fn compare_versions_keeps_negative_components() {
    assert_eq!(compare_versions("1.-1", "1.0"), Ordering::Less);
    assert_eq!(compare_versions("1.0", "1.-1"), Ordering::Greater);
    assert_eq!(compare_versions("-2", "-1"), Ordering::Less);
}

#[test]
fn evaluate_without_installed_version_recommends_fresh_install() {
    let status = InstallationStatus::evaluate("", "1.1.0", PathBuf::from("/opt/app"), true);
    assert!(!status.installed);
    assert!(!status.update_available);
    assert!(!status.repair_available);
    assert_eq!(status.recommended_action, InstallAction::FreshInstall);
    assert_eq!(status.available_version, "1.1.0");
}

#[test]
fn evaluate_older_installed_version_recommends_update() {
    let status = InstallationStatus::evaluate("1.0.0", "1.1.0", PathBuf::from("/x"), true);
    assert!(status.installed);
    assert!(status.update_available);
    assert!(status.repair_available);
    assert_eq!(status.recommended_action, InstallAction::UpdateExisting);
}

#[test]
fn evaluate_same_or_newer_version_recommends_repair() {
    let same = InstallationStatus::evaluate("1.1.0", "1.1", PathBuf::from("/x"), true);
    assert!(!same.update_available);
    assert_eq!(same.recommended_action, InstallAction::RepairExisting);

    let newer = InstallationStatus::evaluate("2.0.0", "1.1.0", PathBuf::from("/x"), true);
    assert!(!newer.update_available);
    assert_eq!(newer.recommended_action, InstallAction::RepairExisting);
}

#[test]
fn evaluate_missing_install_directory_recommends_repair_regardless_of_version() {
    let status = InstallationStatus::evaluate("0.1.0", "1.1.0", PathBuf::from("/gone"), false);
    assert!(status.installed);
    assert!(!status.update_available);
    assert_eq!(status.recommended_action, InstallAction::RepairExisting);
}

#[test]
fn install_action_parse_accepts_cli_tokens() {
    assert_eq!(
        InstallAction::parse("fresh").expect("must parse"),
        InstallAction::FreshInstall
    );
    assert_eq!(
        InstallAction::parse(" Update ").expect("must parse"),
        InstallAction::UpdateExisting
    );
    assert_eq!(
        InstallAction::parse("repair").expect("must parse"),
        InstallAction::RepairExisting
    );
    let err = InstallAction::parse("downgrade").expect_err("must reject unknown action");
    assert!(err.to_string().contains("invalid install action 'downgrade'"));
}

#[test]
fn only_fresh_install_skips_write_check() {
    assert!(!InstallAction::FreshInstall.requires_writable_target());
    assert!(InstallAction::UpdateExisting.requires_writable_target());
    assert!(InstallAction::RepairExisting.requires_writable_target());
}

#[test]
fn installer_state_serializes_iso_utc_timestamp() {
    let modified = Utc
        .with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
        .single()
        .expect("valid timestamp");
    let state = InstallerState::new("/opt/anything-llm", "1.8.0", modified);
    let raw = state.to_json_pretty().expect("must serialize");
    assert!(raw.contains("\"path\": \"/opt/anything-llm\""));
    assert!(raw.contains("\"version\": \"1.8.0\""));
    assert!(raw.contains("\"modified\": \"2025-03-14T09:26:53Z\""));

    let parsed = InstallerState::from_json_str(&raw).expect("must parse");
    assert_eq!(parsed, state);
}

#[test]
fn installer_state_tolerates_missing_fields() {
    let parsed = InstallerState::from_json_str(r#"{"version":"1.0.0"}"#).expect("must parse");
    assert!(parsed.path.is_empty());
    assert_eq!(parsed.version, "1.0.0");
    assert!(parsed.modified.is_none());
}

#[test]
fn installer_state_rejects_corrupt_documents() {
    assert!(InstallerState::from_json_str("{not json").is_err());
    assert!(InstallerState::from_json_str("\"just a string\"").is_err());
}

#[test]
fn installer_state_ignores_unparseable_modified_timestamp() {
    for modified in [r#""""#, "12", r#""yesterday""#, "null", r#"{"at":1}"#] {
        let raw = format!(r#"{{"path":"/opt/llm","version":"1.0.0","modified":{modified}}}"#);
        let parsed = InstallerState::from_json_str(&raw).expect("must parse");
        assert_eq!(parsed.path, "/opt/llm", "modified={modified}");
        assert_eq!(parsed.version, "1.0.0", "modified={modified}");
        assert!(parsed.modified.is_none(), "modified={modified}");
    }
}

#[test]
fn installer_state_reads_non_string_path_and_version_as_empty() {
    let parsed = InstallerState::from_json_str(r#"{"path":null,"version":"1.0.0"}"#)
        .expect("must parse");
    assert!(parsed.path.is_empty());
    assert_eq!(parsed.version, "1.0.0");

    let parsed = InstallerState::from_json_str(r#"{"path":["/opt"],"version":7}"#)
        .expect("must parse");
    assert!(parsed.path.is_empty());
    assert!(parsed.version.is_empty());
}
