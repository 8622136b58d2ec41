//! Shared test helpers: an in-memory chain gateway and a scripted JSON-RPC
//! node.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, Bytes, Log, TxHash, B256};
use alloy::sol_types::SolEvent;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use proxy_deployer::blockchain::{BlockchainError, BlockchainResult, Receipt};
use proxy_deployer::contracts::{CallKind, ContractCall, ProxyDeployed};
use proxy_deployer::workflow::ChainGateway;

/// What the gateway observed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    Submitted { from: Address, call: ContractCall, tx_hash: TxHash },
    Confirmed { tx_hash: TxHash },
}

/// Gateway that records every call and answers from canned logs.
#[derive(Default)]
pub struct MockGateway {
    events: Mutex<Vec<GatewayEvent>>,
    receipts: Mutex<HashMap<TxHash, Vec<Log>>>,
    deploy_logs: Vec<Log>,
    receipt_delay: Duration,
    revert: Option<CallKind>,
}

#[allow(dead_code)]
impl MockGateway {
    /// Deploy receipts carry `deploy_logs`; install receipts carry nothing.
    pub fn with_deploy_logs(deploy_logs: Vec<Log>) -> Self {
        Self {
            deploy_logs,
            ..Self::default()
        }
    }

    pub fn receipt_delay(mut self, delay: Duration) -> Self {
        self.receipt_delay = delay;
        self
    }

    pub fn revert_on(mut self, kind: CallKind) -> Self {
        self.revert = Some(kind);
        self
    }

    pub fn events(&self) -> Vec<GatewayEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<ContractCall> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                GatewayEvent::Submitted { call, .. } => Some(call),
                GatewayEvent::Confirmed { .. } => None,
            })
            .collect()
    }
}

impl ChainGateway for MockGateway {
    async fn submit(&self, from: Address, call: &ContractCall) -> BlockchainResult<TxHash> {
        let mut events = self.events.lock().unwrap();
        let tx_hash = B256::with_last_byte(events.len() as u8 + 1);

        let logs = match call.kind {
            CallKind::DeployProxy => self.deploy_logs.clone(),
            CallKind::InstallModule => Vec::new(),
        };
        self.receipts.lock().unwrap().insert(tx_hash, logs);

        events.push(GatewayEvent::Submitted {
            from,
            call: call.clone(),
            tx_hash,
        });
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Receipt> {
        if !self.receipt_delay.is_zero() {
            tokio::time::sleep(self.receipt_delay).await;
        }

        let kind = self.events().iter().find_map(|event| match event {
            GatewayEvent::Submitted { call, tx_hash: h, .. } if *h == tx_hash => Some(call.kind),
            _ => None,
        });
        if kind.is_some() && kind == self.revert {
            return Err(BlockchainError::Reverted(tx_hash));
        }

        let logs = self
            .receipts
            .lock()
            .unwrap()
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| BlockchainError::Rpc(format!("unknown transaction {}", tx_hash)))?;

        self.events
            .lock()
            .unwrap()
            .push(GatewayEvent::Confirmed { tx_hash });

        Ok(Receipt {
            tx_hash,
            block_number: Some(1),
            status: true,
            logs,
        })
    }
}

/// A `ProxyDeployed` log emitted by `factory`.
pub fn proxy_deployed_log(factory: Address, proxy: Address, deployer: Address) -> Log {
    let event = ProxyDeployed {
        implementation: Address::repeat_byte(0x11),
        proxy,
        deployer,
        data: Bytes::new(),
    };
    Log {
        address: factory,
        data: event.encode_log_data(),
    }
}

/// Start a JSON-RPC node on an ephemeral port.
///
/// `handler` receives the method name and params of every request and
/// returns the `result` value.
#[allow(dead_code)]
pub async fn start_json_rpc<F>(handler: F) -> SocketAddr
where
    F: Fn(&str, &Value) -> Value + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let handler = handler.clone();
            tokio::spawn(async move {
                let _ = serve_connection(socket, handler).await;
            });
        }
    });

    addr
}

async fn serve_connection<F>(mut socket: TcpStream, handler: Arc<F>) -> std::io::Result<()>
where
    F: Fn(&str, &Value) -> Value,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let header_end = loop {
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                return Ok(());
            }
            buf.extend_from_slice(&chunk[..n]);
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                return Ok(());
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let request: Value =
            serde_json::from_slice(&buf[header_end..header_end + content_length])
                .unwrap_or(Value::Null);
        buf.drain(..header_end + content_length);

        let method = request["method"].as_str().unwrap_or_default();
        let result = handler(method, &request["params"]);
        let body = json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }).to_string();

        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await?;
    }
}

/// `eth_getTransactionReceipt` result for a transaction mined in `block`.
#[allow(dead_code)]
pub fn receipt_json(tx_hash: TxHash, block: u64, success: bool) -> Value {
    json!({
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0xbb),
        "blockNumber": format!("{:#x}", block),
        "from": Address::repeat_byte(0xaa),
        "to": Address::repeat_byte(0xfa),
        "cumulativeGasUsed": "0x5208",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "contractAddress": null,
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
    })
}
