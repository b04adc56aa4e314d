//! Property-based tests for settings serialization.

use gitlab_reporter::types::settings::{
    LoggingSettings, NetworkSettings, ReporterSettings, StorageSettings,
};
use proptest::prelude::*;

fn arb_settings() -> impl Strategy<Value = ReporterSettings> {
    (
        "[a-z0-9_-]{1,20}\\.db",
        1u64..600,
        "[ -~]{0,40}",
        prop_oneof![
            Just("error"),
            Just("warn"),
            Just("info"),
            Just("debug"),
            Just("trace"),
        ],
    )
        .prop_map(|(database_file, timeout_secs, user_agent, level)| ReporterSettings {
            storage: StorageSettings { database_file },
            network: NetworkSettings {
                timeout_secs,
                user_agent,
            },
            logging: LoggingSettings {
                level: level.to_string(),
            },
        })
}

// **Property 5: Settings JSON round trip**
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn settings_json_round_trip(settings in arb_settings()) {
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let restored: ReporterSettings = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(restored, settings);
    }
}
