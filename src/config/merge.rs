//! Apply command-line overrides on top of a loaded config

use crate::domain::Config;

/// Values given on the command line. `None` leaves the file value in place.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub default_project: Option<String>,
    pub shorthand_hosts: Option<Vec<String>>,
    pub numeric_shorthand_hosts: Option<Vec<String>>,
    pub revision_url_format: Option<String>,
    pub max_total_length: Option<usize>,
}

pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    if let Some(project) = cli.default_project {
        config.default_project = Some(project);
    }
    if let Some(hosts) = cli.shorthand_hosts {
        config.shorthand_hosts = hosts;
    }
    if let Some(hosts) = cli.numeric_shorthand_hosts {
        config.numeric_shorthand_hosts = hosts;
    }
    if let Some(format) = cli.revision_url_format {
        config.revision_url_format = format;
    }
    if let Some(max) = cli.max_total_length {
        config.max_total_length = max;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_values_win_over_file_values() {
        let file = Config { default_project: Some("monorail".to_string()), ..Config::default() };
        let merged = merge_cli_with_config(
            file,
            CliOverrides {
                default_project: Some("chromium".to_string()),
                max_total_length: Some(10),
                ..CliOverrides::default()
            },
        );
        assert_eq!(merged.default_project.as_deref(), Some("chromium"));
        assert_eq!(merged.max_total_length, 10);
    }

    #[test]
    fn missing_cli_values_keep_file_values() {
        let file = Config {
            shorthand_hosts: vec!["go".to_string()],
            revision_url_format: "https://example.com/+/{revnum}".to_string(),
            ..Config::default()
        };
        let merged = merge_cli_with_config(file.clone(), CliOverrides::default());
        assert_eq!(merged, file);
    }
}
