use clap::Parser;
use std::net::SocketAddr;

/// NBA salary predictor web form
#[derive(Parser, Debug, Clone)]
#[command(name = "nba-salary-predictor", version, about)]
pub struct Config {
    /// HTTP listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// Path to the trained random-forest artifact (JSON)
    #[arg(long, env = "MODEL_PATH", default_value = "nba_salary_rf_model.json")]
    pub model_path: String,

    /// Remote scoring endpoint; when set, used instead of the local artifact
    #[arg(long, env = "SCORER_URL")]
    pub scorer_url: Option<String>,

    /// Directory served under /assets (logos, images)
    #[arg(long, env = "ASSETS_DIR")]
    pub assets_dir: Option<String>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.listen_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!("listen_addr '{}' is not a valid socket address", self.listen_addr);
        }
        if let Some(raw) = &self.scorer_url {
            let url = url::Url::parse(raw)
                .map_err(|e| anyhow::anyhow!("scorer_url '{}' is invalid: {}", raw, e))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                anyhow::bail!("scorer_url must use http or https, got '{}'", url.scheme());
            }
        }
        if self.scorer_url.is_none() && self.model_path.trim().is_empty() {
            anyhow::bail!("model_path must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["nba-salary-predictor"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).expect("args should parse")
    }

    fn default_of(id: &str) -> String {
        let command = Config::command();
        let arg = command
            .get_arguments()
            .find(|a| a.get_id() == id)
            .expect("argument exists");
        arg.get_default_values()[0].to_string_lossy().into_owned()
    }

    #[test]
    fn defaults_are_valid() {
        // Read from the declared defaults so exported env vars cannot leak in.
        let config = Config {
            listen_addr: default_of("listen_addr"),
            model_path: default_of("model_path"),
            scorer_url: None,
            assets_dir: None,
        };
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.model_path, "nba_salary_rf_model.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_listen_addr() {
        assert!(parse(&["--listen-addr", "localhost"]).validate().is_err());
    }

    #[test]
    fn scorer_url_must_be_http() {
        assert!(parse(&[
            "--listen-addr",
            "127.0.0.1:8080",
            "--scorer-url",
            "http://127.0.0.1:5000/predict",
        ])
        .validate()
        .is_ok());
        assert!(parse(&["--scorer-url", "ftp://models/predict"]).validate().is_err());
        assert!(parse(&["--scorer-url", "not a url"]).validate().is_err());
    }
}
