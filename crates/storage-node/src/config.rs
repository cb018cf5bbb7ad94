//! Storage-node configuration: environment first, then command-line.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "storage-node", about = "Storage node for the sharded key-value service")]
struct Cli {
    #[arg(long = "node-id")]
    node_id: Option<String>,

    #[arg(long = "port", default_value_t = 8080)]
    port: u16,

    #[arg(long = "gateway")]
    gateway: Option<String>,

    /// Address advertised to the gateway and to clients — must be
    /// reachable from both, unlike the bind address (always `0.0.0.0`).
    #[arg(long = "address", default_value = "127.0.0.1")]
    address: String,
}

pub struct StorageNodeConfig {
    pub node_id: String,
    pub listen_port: u16,
    pub gateway_address: String,
    pub advertise_address: String,
}

impl StorageNodeConfig {
    pub fn from_env_and_args() -> anyhow::Result<Self> {
        let cli = Cli::parse();

        let node_id = std::env::var("NODE_ID")
            .ok()
            .or(cli.node_id)
            .ok_or_else(|| anyhow::anyhow!("node-id is required (NODE_ID or --node-id)"))?;

        let listen_port = std::env::var("LISTEN_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(cli.port);

        let gateway_address = std::env::var("GATEWAY_ADDRESS")
            .ok()
            .or(cli.gateway)
            .ok_or_else(|| anyhow::anyhow!("gateway-address is required (GATEWAY_ADDRESS or --gateway)"))?;

        let advertise_address = std::env::var("ADVERTISE_ADDRESS").ok().unwrap_or(cli.address);

        Ok(Self {
            node_id,
            listen_port,
            gateway_address,
            advertise_address,
        })
    }
}
