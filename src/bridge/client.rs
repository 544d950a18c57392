use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use tracing::{debug, info};

use crate::bridge::{
    CheckAdd, CompanyInfoRow, EmployeeRow, HelloRequest, LedgerBridge, Reply, Request, SubmitReply,
    TimeEntryAdd, WageItemRow,
};
use crate::error::{Result, ToolError};

/// Bridge endpoint used when none is given on the command line.
pub const DEFAULT_BRIDGE_ADDR: &str = "127.0.0.1:8693";

const APP_ID: &str = "PaydayTools.Import";
const APP_NAME: &str = "Payday Import Tools";

/// A live session against the accounting application's automation bridge.
///
/// The session owns the socket for the duration of one run. [`connect`]
/// performs the handshake; dropping the session sends the teardown request
/// best-effort, so every exit path, early returns and panics included,
/// releases the application-side session.
///
/// [`connect`]: BridgeSession::connect
pub struct BridgeSession {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl BridgeSession {
    /// Connects to the bridge and establishes an application session.
    pub fn connect(addr: &str) -> Result<Self> {
        let connection_error = |reason: String| ToolError::Connection {
            addr: addr.to_string(),
            reason,
        };

        let writer = TcpStream::connect(addr).map_err(|error| connection_error(error.to_string()))?;
        let reader = BufReader::new(
            writer
                .try_clone()
                .map_err(|error| connection_error(error.to_string()))?,
        );
        let mut session = Self { reader, writer };

        let hello = Request::Hello(HelloRequest {
            app_id: APP_ID.to_string(),
            app_name: APP_NAME.to_string(),
        });
        match session.exchange(&hello)? {
            Reply::Hello(reply) if reply.status_code == 0 => {
                info!(addr, "accounting session established");
                Ok(session)
            }
            Reply::Hello(reply) => Err(connection_error(format!(
                "handshake rejected with status {}: {}",
                reply.status_code, reply.status_message
            ))),
            other => Err(unexpected("hello", &other)),
        }
    }

    /// Writes one request line and reads the single reply line answering it.
    fn exchange(&mut self, request: &Request) -> Result<Reply> {
        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        self.writer
            .write_all(line.as_bytes())
            .map_err(|error| ToolError::Bridge(error.to_string()))?;

        let mut reply_line = String::new();
        let bytes = self
            .reader
            .read_line(&mut reply_line)
            .map_err(|error| ToolError::Bridge(error.to_string()))?;
        if bytes == 0 {
            return Err(ToolError::Bridge("connection closed by bridge".to_string()));
        }
        Ok(serde_json::from_str(&reply_line)?)
    }
}

impl LedgerBridge for BridgeSession {
    fn company_info(&mut self) -> Result<CompanyInfoRow> {
        match self.exchange(&Request::CompanyQuery)? {
            Reply::Company(reply) if reply.status_code != 0 => Err(ToolError::Query {
                status_code: reply.status_code,
                message: reply.status_message,
            }),
            Reply::Company(reply) => reply
                .company
                .ok_or_else(|| ToolError::Bridge("company reply carried no detail".to_string())),
            other => Err(unexpected("company", &other)),
        }
    }

    fn list_employees(&mut self) -> Result<Vec<EmployeeRow>> {
        match self.exchange(&Request::EmployeeQuery)? {
            Reply::Employees(reply) if reply.status_code == 0 => Ok(reply.employees),
            Reply::Employees(reply) => Err(ToolError::Query {
                status_code: reply.status_code,
                message: reply.status_message,
            }),
            other => Err(unexpected("employees", &other)),
        }
    }

    fn list_wage_items(&mut self) -> Result<Vec<WageItemRow>> {
        match self.exchange(&Request::WageItemQuery)? {
            Reply::WageItems(reply) if reply.status_code == 0 => Ok(reply.wage_items),
            Reply::WageItems(reply) => Err(ToolError::Query {
                status_code: reply.status_code,
                message: reply.status_message,
            }),
            other => Err(unexpected("wage_items", &other)),
        }
    }

    fn add_check(&mut self, check: CheckAdd) -> Result<SubmitReply> {
        match self.exchange(&Request::CheckAdd(check))? {
            Reply::Submit(reply) => Ok(reply),
            other => Err(unexpected("submit", &other)),
        }
    }

    fn add_time_entry(&mut self, entry: TimeEntryAdd) -> Result<SubmitReply> {
        match self.exchange(&Request::TimeEntryAdd(entry))? {
            Reply::Submit(reply) => Ok(reply),
            other => Err(unexpected("submit", &other)),
        }
    }
}

impl Drop for BridgeSession {
    fn drop(&mut self) {
        // Teardown is best-effort; the bridge also reclaims dropped sockets.
        if let Ok(Reply::Goodbye(reply)) = self.exchange(&Request::Goodbye) {
            debug!(status_code = reply.status_code, "accounting session closed");
        }
    }
}

fn unexpected(expected: &'static str, got: &Reply) -> ToolError {
    ToolError::UnexpectedReply {
        expected,
        got: got.kind(),
    }
}
