use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// HTTP plumbing that would otherwise drown out the simulation logs.
const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "tower", "tower_http"];

/// Directives used when `RUST_LOG` is unset.
fn default_directives(level: &str) -> String {
    let mut directives = format!("bondtent={level}");
    for module in NOISY_MODULES {
        directives.push_str(&format!(",{module}=warn"));
    }
    directives
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Install a stderr subscriber; `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_quiet_http_modules() {
        assert_eq!(
            default_directives("debug"),
            "bondtent=debug,hyper=warn,hyper_util=warn,tower=warn,tower_http=warn"
        );
    }

    #[test]
    fn default_directives_parse_as_a_filter() {
        let filter = EnvFilter::try_new(default_directives("trace")).expect("valid directives");
        let rendered = filter.to_string();
        assert!(rendered.contains("bondtent=trace"));
        assert!(rendered.contains("hyper=warn"));
    }
}
