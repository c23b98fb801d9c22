use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "portald", version, about = "Webhook gateway for the teacher/parent portal")]
pub struct Cli {
    #[arg(long, env = "PORTALD_BIND", default_value = "127.0.0.1:9002")]
    pub bind: String,

    /// Automation webhook that receives every forwarded envelope
    #[arg(long, env = "N8N_WEBHOOK_URL")]
    pub upstream_url: Option<String>,

    /// Answer events from the in-process mock data instead of the upstream
    #[arg(long, env = "PORTALD_MOCK_API", default_value_t = false)]
    pub mock_api: bool,

    /// Keep the last request/response pairs for /api/dev/logs
    #[arg(long, env = "PORTALD_DEV_LOG", default_value_t = false)]
    pub dev_log: bool,

    #[arg(long, env = "PORTALD_LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl Cli {
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(self.upstream_url.clone())
            .with_mock_api(self.mock_api)
            .with_dev_log(self.dev_log)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub upstream_url: Option<String>,
    pub mock_api: bool,
    pub dev_log: bool,
}

impl GatewayConfig {
    /// A blank upstream URL is treated the same as a missing one.
    pub fn new(upstream_url: Option<String>) -> Self {
        let upstream_url = upstream_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        Self {
            upstream_url,
            mock_api: false,
            dev_log: false,
        }
    }

    pub fn with_mock_api(mut self, enabled: bool) -> Self {
        self.mock_api = enabled;
        self
    }

    pub fn with_dev_log(mut self, enabled: bool) -> Self {
        self.dev_log = enabled;
        self
    }

    pub fn is_upstream_configured(&self) -> bool {
        self.upstream_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_upstream_is_unset() {
        assert!(!GatewayConfig::new(Some("   ".into())).is_upstream_configured());
        assert!(!GatewayConfig::new(None).is_upstream_configured());
        let cfg = GatewayConfig::new(Some(" http://n8n.local/webhook ".into()));
        assert_eq!(cfg.upstream_url.as_deref(), Some("http://n8n.local/webhook"));
    }

    #[test]
    fn cli_flags_flow_into_config() {
        let cli = Cli::try_parse_from([
            "portald",
            "--upstream-url",
            "http://n8n.local/webhook",
            "--mock-api",
            "--dev-log",
        ])
        .expect("parse args");
        let cfg = cli.gateway_config();
        assert!(cfg.is_upstream_configured());
        assert!(cfg.mock_api);
        assert!(cfg.dev_log);
    }
}
