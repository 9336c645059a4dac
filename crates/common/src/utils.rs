use tracing::info;

pub fn print_startup_string(
    pkg_description: &str,
    pkg_version: &str,
    git_version: Option<&str>,
    target: &str,
    built_time: &str,
    rustc_version: &str,
) {
    info!("Starting {}", pkg_description);
    info!("{}", startup_details(pkg_version, git_version, target, built_time, rustc_version));
}

pub fn print_shutdown_string() {
    info!("Exiting");
}

fn startup_details(
    pkg_version: &str,
    git_version: Option<&str>,
    target: &str,
    built_time: &str,
    rustc_version: &str,
) -> String {
    let git_information = match git_version {
        None => "".to_string(),
        Some(git) => format!(" (Git information: {git})"),
    };
    format!(
        "This is version {}{}, built for {} by {} at {}",
        pkg_version, git_information, target, rustc_version, built_time
    )
}

/// Environment variable holding the connection `conn_id`, as the workflow engine names it.
pub fn connection_env_var(prefix: &str, conn_id: &str) -> String {
    format!("{}{}", prefix, conn_id.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_details_mention_git_only_when_known() {
        let with_git = startup_details("0.1.4", Some("abc123"), "x86_64", "now", "rustc 1.72");
        assert_eq!(
            with_git,
            "This is version 0.1.4 (Git information: abc123), built for x86_64 by rustc 1.72 at now"
        );
        let without_git = startup_details("0.1.4", None, "x86_64", "now", "rustc 1.72");
        assert!(!without_git.contains("Git"));
    }

    #[test]
    fn connection_env_var_is_upper_cased() {
        assert_eq!(
            connection_env_var("AIRFLOW_CONN_", "kubernetes_default"),
            "AIRFLOW_CONN_KUBERNETES_DEFAULT"
        );
    }
}
