//! Subcommands for the operator CLI: run a gateway or storage node in the
//! foreground, issue a routed client operation against a running cluster,
//! or inspect a ring offline (no network).

use clap::Subcommand;
use corelib::node::{Node, NodeId};
use corelib::ring::HashRing;
use corelib::topology::Topology;
use std::collections::HashMap;

/// What a command produced, for `CliConfig::run` to print.
#[derive(Debug)]
pub enum CommandResult {
    Message(String),
    Value(serde_json::Value),
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a routing gateway in the foreground.
    Gateway {
        #[arg(long)]
        gateway_id: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Peer gateways as `host:port`.
        #[arg(long, num_args = 0.., value_delimiter = ' ')]
        peers: Vec<String>,
    },

    /// Run a storage node in the foreground.
    Node {
        #[arg(long)]
        node_id: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
        /// Gateway to register with, as `host:port`.
        #[arg(long)]
        gateway: String,
        /// Address advertised to the gateway and to clients.
        #[arg(long, default_value = "127.0.0.1")]
        address: String,
    },

    /// Store a value for a key, routed through a gateway.
    Put {
        #[arg(long)]
        gateway: String,
        key: String,
        /// A JSON value, or a bare string if it doesn't parse as JSON.
        value: String,
    },

    /// Fetch a value by key, routed through a gateway.
    Get {
        #[arg(long)]
        gateway: String,
        key: String,
    },

    /// Delete a key, routed through a gateway.
    Delete {
        #[arg(long)]
        gateway: String,
        key: String,
    },

    /// Offline ring-inspection utilities — no network, no running cluster.
    Ring {
        #[command(subcommand)]
        action: RingAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum RingAction {
    /// Build a ring from the given node ids and print its token
    /// distribution.
    Describe {
        #[arg(required = true)]
        nodes: Vec<String>,
        #[arg(long, default_value_t = 150)]
        vnodes: usize,
    },

    /// Measure how many of `keys` synthetic keys remap when a single node
    /// is added to a ring of `nodes` synthetic nodes (§8's "low
    /// remapping" property, run interactively instead of as a test).
    Bench {
        #[arg(long, default_value_t = 10)]
        nodes: usize,
        #[arg(long, default_value_t = 150)]
        vnodes: usize,
        #[arg(long, default_value_t = 1000)]
        keys: usize,
    },
}

impl Command {
    pub async fn execute(self) -> anyhow::Result<CommandResult> {
        match self {
            Command::Gateway { gateway_id, port, peers } => {
                let config = gateway::GatewayConfig {
                    gateway_id,
                    listen_port: port,
                    peers,
                };
                gateway::run(config).await?;
                Ok(CommandResult::Message("gateway exited".to_string()))
            }
            Command::Node {
                node_id,
                port,
                gateway,
                address,
            } => {
                let config = storage_node::StorageNodeConfig {
                    node_id,
                    listen_port: port,
                    gateway_address: gateway,
                    advertise_address: address,
                };
                storage_node::run(config).await?;
                Ok(CommandResult::Message("storage node exited".to_string()))
            }
            Command::Put { gateway, key, value } => {
                let parsed: serde_json::Value =
                    serde_json::from_str(&value).unwrap_or_else(|_| serde_json::Value::String(value.clone()));
                let client = client::Client::new(gateway);
                client.put(&key, parsed).await?;
                Ok(CommandResult::Message(format!("stored {key}")))
            }
            Command::Get { gateway, key } => {
                let client = client::Client::new(gateway);
                let value = client.get(&key).await?;
                Ok(CommandResult::Value(value))
            }
            Command::Delete { gateway, key } => {
                let client = client::Client::new(gateway);
                client.delete(&key).await?;
                Ok(CommandResult::Message(format!("deleted {key}")))
            }
            Command::Ring { action } => action.execute(),
        }
    }
}

impl RingAction {
    fn execute(self) -> anyhow::Result<CommandResult> {
        match self {
            RingAction::Describe { nodes, vnodes } => {
                let ring = HashRing::new();
                for id in &nodes {
                    ring.add_node(Node::new(id.as_str(), id.as_str()), vnodes);
                }
                Ok(CommandResult::Message(Topology::new(ring).describe()))
            }
            RingAction::Bench { nodes, vnodes, keys } => {
                let ring = HashRing::new();
                for i in 0..nodes {
                    ring.add_node(Node::new(format!("node-{i}"), format!("node-{i}")), vnodes);
                }

                let sample: Vec<String> = (0..keys).map(|i| format!("bench-key-{i}")).collect();
                let before: HashMap<&String, NodeId> = sample
                    .iter()
                    .map(|k| (k, ring.lookup(k.as_bytes()).expect("ring is non-empty")))
                    .collect();

                ring.add_node(Node::new(format!("node-{nodes}"), format!("node-{nodes}")), vnodes);

                let moved = sample
                    .iter()
                    .filter(|k| ring.lookup(k.as_bytes()).as_ref() != before.get(k))
                    .count();

                Ok(CommandResult::Message(format!(
                    "added 1 node to a ring of {nodes}: {moved}/{keys} keys remapped ({:.1}%)",
                    100.0 * moved as f64 / keys as f64
                )))
            }
        }
    }
}
