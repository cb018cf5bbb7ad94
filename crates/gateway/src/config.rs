//! Gateway configuration: environment first, then command-line (§6).

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "gateway", about = "Routing gateway for the sharded key-value service")]
struct Cli {
    #[arg(long = "gateway-id")]
    gateway_id: Option<String>,

    #[arg(long = "port", default_value_t = 8000)]
    port: u16,

    /// Space-separated `host:port` peer list.
    #[arg(long = "peers", num_args = 0.., value_delimiter = ' ')]
    peers: Vec<String>,
}

pub struct GatewayConfig {
    pub gateway_id: String,
    pub listen_port: u16,
    pub peers: Vec<String>,
}

impl GatewayConfig {
    /// Parse from `std::env::args()`, preferring environment variables
    /// over the equivalent flag when both are present.
    pub fn from_env_and_args() -> anyhow::Result<Self> {
        let cli = Cli::parse();

        let gateway_id = std::env::var("GATEWAY_ID")
            .ok()
            .or(cli.gateway_id)
            .ok_or_else(|| anyhow::anyhow!("gateway-id is required (GATEWAY_ID or --gateway-id)"))?;

        let listen_port = std::env::var("LISTEN_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(cli.port);

        let peers = std::env::var("PEER_GATEWAYS")
            .ok()
            .map(|v| v.split_whitespace().map(str::to_string).collect())
            .unwrap_or(cli.peers);

        Ok(Self {
            gateway_id,
            listen_port,
            peers,
        })
    }
}
