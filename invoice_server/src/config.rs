use std::env;

use ifg_common::{parse_boolean_flag, Secret};
use log::*;

const DEFAULT_IFG_HOST: &str = "127.0.0.1";
const DEFAULT_IFG_PORT: u16 = 8360;
const DEFAULT_JOURNAL_DIR: &str = "./journal";
const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_GITHUB_BRANCH: &str = "main";
const DEFAULT_GITHUB_PATH_PREFIX: &str = "invoices";
const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the append-only order and verification logs.
    pub journal_dir: String,
    pub gateway: GatewayConfig,
    /// Shared secret for webhook raw-body HMAC checks.
    pub webhook_secret: Secret<String>,
    /// When false, webhook events are accepted without a signature check. Forced off (with a loud
    /// warning) when no webhook secret is configured.
    pub webhook_checks: bool,
    /// Present iff the archival upload sink is configured.
    pub archive: Option<ArchiveConfig>,
    /// Present iff the email notification sink is configured.
    pub email: Option<EmailConfig>,
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_IFG_HOST.to_string(),
            port: DEFAULT_IFG_PORT,
            journal_dir: DEFAULT_JOURNAL_DIR.to_string(),
            gateway: GatewayConfig::default(),
            webhook_secret: Secret::default(),
            webhook_checks: false,
            archive: None,
            email: None,
            store: StoreConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("IFG_HOST").ok().unwrap_or_else(|| DEFAULT_IFG_HOST.into());
        let port = env::var("IFG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for IFG_PORT. {e} Using the default, {DEFAULT_IFG_PORT}, instead."
                    );
                    DEFAULT_IFG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_IFG_PORT);
        let journal_dir = env::var("IFG_JOURNAL_DIR").ok().unwrap_or_else(|| {
            info!("🪛️ IFG_JOURNAL_DIR is not set. Using {DEFAULT_JOURNAL_DIR}.");
            DEFAULT_JOURNAL_DIR.into()
        });
        let gateway = GatewayConfig::from_env_or_default();
        let webhook_secret = Secret::new(env::var("IFG_WEBHOOK_SECRET").ok().unwrap_or_default());
        let requested_checks = parse_boolean_flag(env::var("IFG_WEBHOOK_CHECKS").ok(), true);
        let webhook_checks = resolve_webhook_checks(requested_checks, &webhook_secret);
        let archive = ArchiveConfig::try_from_env();
        let email = EmailConfig::try_from_env();
        let store = StoreConfig::from_env_or_default();
        Self { host, port, journal_dir, gateway, webhook_secret, webhook_checks, archive, email, store }
    }
}

/// Disabled webhook checks always get a loud warning, whether they were switched off explicitly or
/// forced off by a missing secret. Accepting unsigned webhook events is never silent.
fn resolve_webhook_checks(requested: bool, secret: &Secret<String>) -> bool {
    if requested && secret.is_empty() {
        warn!(
            "🚨️ IFG_WEBHOOK_SECRET is not set, so webhook signature checks are DISABLED. Every webhook event will \
             be accepted. Set the secret to re-enable verification."
        );
        return false;
    }
    if !requested {
        warn!(
            "🚨️ IFG_WEBHOOK_CHECKS is off, so webhook signature checks are DISABLED. Every webhook event will be \
             accepted."
        );
    }
    requested
}

//-------------------------------------------------  GatewayConfig  ---------------------------------------------------
/// Payment gateway (Razorpay) credentials. The key secret doubles as the HMAC key for
/// client-submitted verification claims.
#[derive(Clone, Debug, Default)]
pub struct GatewayConfig {
    pub api_url: String,
    pub key_id: String,
    pub key_secret: Secret<String>,
}

impl GatewayConfig {
    pub fn from_env_or_default() -> Self {
        let api_url = env::var("IFG_RAZORPAY_API_URL").ok().unwrap_or_else(|| DEFAULT_RAZORPAY_API_URL.into());
        let key_id = env::var("IFG_RAZORPAY_KEY_ID").ok().unwrap_or_else(|| {
            error!("🪛️ IFG_RAZORPAY_KEY_ID is not set. Order creation will fail until it is configured.");
            String::default()
        });
        let key_secret = env::var("IFG_RAZORPAY_KEY_SECRET").ok().unwrap_or_else(|| {
            error!(
                "🪛️ IFG_RAZORPAY_KEY_SECRET is not set. Payment verification and order creation will fail until it \
                 is configured."
            );
            String::default()
        });
        Self { api_url, key_id, key_secret: Secret::new(key_secret) }
    }
}

//-------------------------------------------------  ArchiveConfig  ---------------------------------------------------
/// Where archived invoices get committed: a version-controlled file host reached over its contents
/// API. Token and repo are both required; without them the sink is simply not configured.
#[derive(Clone, Debug)]
pub struct ArchiveConfig {
    pub api_url: String,
    /// "owner/name"
    pub repo: String,
    pub branch: String,
    pub path_prefix: String,
    pub token: Secret<String>,
}

impl ArchiveConfig {
    pub fn try_from_env() -> Option<Self> {
        let token = env::var("IFG_GITHUB_TOKEN").ok().filter(|s| !s.is_empty());
        let repo = env::var("IFG_GITHUB_REPO").ok().filter(|s| !s.is_empty());
        let (token, repo) = match (token, repo) {
            (Some(token), Some(repo)) => (token, repo),
            _ => {
                info!(
                    "🪛️ IFG_GITHUB_TOKEN and/or IFG_GITHUB_REPO are not set. Invoice archival is disabled; rendered \
                     invoices will not be uploaded."
                );
                return None;
            },
        };
        let api_url = env::var("IFG_GITHUB_API_URL").ok().unwrap_or_else(|| DEFAULT_GITHUB_API_URL.into());
        let branch = env::var("IFG_GITHUB_BRANCH").ok().unwrap_or_else(|| DEFAULT_GITHUB_BRANCH.into());
        let path_prefix = env::var("IFG_GITHUB_PATH_PREFIX").ok().unwrap_or_else(|| DEFAULT_GITHUB_PATH_PREFIX.into());
        Some(Self { api_url, repo, branch, path_prefix, token: Secret::new(token) })
    }
}

//-------------------------------------------------  EmailConfig  -----------------------------------------------------
/// Transactional email API credentials. Key and sender are both required; without them the
/// notification sink is not configured and customers are not emailed.
#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub api_url: String,
    pub api_key: Secret<String>,
    pub sender: String,
    pub bcc: Option<String>,
}

impl EmailConfig {
    pub fn try_from_env() -> Option<Self> {
        let api_key = env::var("IFG_EMAIL_API_KEY").ok().filter(|s| !s.is_empty());
        let sender = env::var("IFG_EMAIL_SENDER").ok().filter(|s| !s.is_empty());
        let (api_key, sender) = match (api_key, sender) {
            (Some(api_key), Some(sender)) => (api_key, sender),
            _ => {
                info!(
                    "🪛️ IFG_EMAIL_API_KEY and/or IFG_EMAIL_SENDER are not set. Email notification is disabled; \
                     customers will not receive invoices by mail."
                );
                return None;
            },
        };
        let api_url = env::var("IFG_EMAIL_API_URL").ok().unwrap_or_else(|| DEFAULT_EMAIL_API_URL.into());
        let bcc = env::var("IFG_EMAIL_BCC").ok().filter(|s| !s.is_empty());
        Some(Self { api_url, api_key: Secret::new(api_key), sender, bcc })
    }
}

//-------------------------------------------------  StoreConfig  -----------------------------------------------------
/// Merchant display fields. Only used in rendered invoice output.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "Invoice Fulfillment Gateway".to_string(),
            address: String::default(),
            email: String::default(),
            phone: String::default(),
        }
    }
}

impl StoreConfig {
    pub fn from_env_or_default() -> Self {
        let defaults = Self::default();
        Self {
            name: env::var("IFG_STORE_NAME").ok().filter(|s| !s.is_empty()).unwrap_or(defaults.name),
            address: env::var("IFG_STORE_ADDRESS").ok().unwrap_or(defaults.address),
            email: env::var("IFG_STORE_EMAIL").ok().unwrap_or(defaults.email),
            phone: env::var("IFG_STORE_PHONE").ok().unwrap_or(defaults.phone),
        }
    }
}
