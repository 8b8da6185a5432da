use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log targets owned by this package: the library and each binary crate.
const CRATE_TARGETS: [&str; 3] = ["flight_routes_etl", "toml_etl", "route_planner"];

fn default_directive(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut directive = CRATE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",");
    if verbose {
        directive.push_str(",info");
    }
    directive
}

fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// JSON lines on stdout, for runs collected by a log shipper.
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

pub fn init_logger(verbose: bool, json: bool) {
    if json {
        init_json_logger(verbose);
    } else {
        init_cli_logger(verbose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_covers_every_binary() {
        let directive = default_directive(false);
        assert_eq!(directive, "flight_routes_etl=info,toml_etl=info,route_planner=info");
        assert!(directive.parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn test_verbose_directive() {
        let directive = default_directive(true);
        assert_eq!(
            directive,
            "flight_routes_etl=debug,toml_etl=debug,route_planner=debug,info"
        );
        assert!(directive.parse::<EnvFilter>().is_ok());
    }
}
