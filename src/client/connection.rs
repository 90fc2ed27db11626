//! Connection Session
//!
//! Owns the stream to one DICT server and runs the command/response cycle.

use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::{Config, ReplyPolicy, DEFAULT_PORT};
use crate::error::{DictError, Result};
use crate::model::{Database, Definition, Greeting, MatchingStrategy};
use crate::protocol::{codes, decode_reply, write_line, Command, Reply, Status};

/// An open session with a DICT server
///
/// ## Concurrency
/// Every public operation holds `session` for the whole exchange: the
/// command line, the opening status, every block and the final status. A
/// connection can be shared across threads (e.g. in an `Arc`); callers are
/// served one at a time.
///
/// After a protocol failure the stream position is unknown, so the session
/// is poisoned and refuses further commands.
pub struct DictConnection {
    /// Stream endpoints and exchange state
    session: Mutex<Session>,

    /// Parsed 220 banner
    greeting: Greeting,

    /// DEFINE/MATCH handling of data-less replies
    reply_policy: ReplyPolicy,

    /// Peer address for logging
    peer_addr: String,
}

/// Stream endpoints, only reachable through the mutex
struct Session {
    reader: Box<dyn BufRead + Send>,
    writer: Box<dyn Write + Send>,

    /// Underlying socket, shut down last on close
    socket: Option<TcpStream>,

    /// A protocol failure left the stream mid-reply
    poisoned: bool,

    /// SHOW INFO returned without reading a trailing 250 that may follow
    trailer_pending: bool,

    closed: bool,
}

impl DictConnection {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Connect to `host:port` and validate the greeting
    pub fn open(host: &str, port: u16) -> Result<Self> {
        Self::connect(Config::builder().host(host).port(port).build())
    }

    /// Connect to `host` on the default DICT port (2628)
    pub fn open_default(host: &str) -> Result<Self> {
        Self::open(host, DEFAULT_PORT)
    }

    /// Connect using a full configuration
    pub fn connect(config: Config) -> Result<Self> {
        let addr = config.addr();
        tracing::debug!("Connecting to {}", addr);

        let stream = Self::dial(&config).map_err(|e| {
            DictError::Connection(format!("Cannot connect to {}: {}", addr, e))
        })?;

        let (read_stream, write_stream) = Self::split(&stream, &config).map_err(|e| {
            DictError::Connection(format!("Cannot configure stream to {}: {}", addr, e))
        })?;

        let session = Session {
            reader: Box::new(BufReader::new(read_stream)),
            writer: Box::new(BufWriter::new(write_stream)),
            socket: Some(stream),
            poisoned: false,
            trailer_pending: false,
            closed: false,
        };
        Self::handshake(session, &config, addr)
    }

    /// Run a session over an arbitrary line stream
    ///
    /// The greeting is read from `reader` exactly as for a TCP session.
    pub fn from_stream<R, W>(reader: R, writer: W, config: &Config) -> Result<Self>
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        let session = Session {
            reader: Box::new(reader),
            writer: Box::new(writer),
            socket: None,
            poisoned: false,
            trailer_pending: false,
            closed: false,
        };
        Self::handshake(session, config, "stream".to_string())
    }

    /// Apply timeouts and clone separate read/write handles
    fn split(stream: &TcpStream, config: &Config) -> io::Result<(TcpStream, TcpStream)> {
        stream.set_nodelay(true)?;
        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }
        Ok((stream.try_clone()?, stream.try_clone()?))
    }

    fn dial(config: &Config) -> io::Result<TcpStream> {
        if config.connect_timeout_ms == 0 {
            return TcpStream::connect((config.host.as_str(), config.port));
        }

        let timeout = Duration::from_millis(config.connect_timeout_ms);
        let mut last_err = None;
        for addr in (config.host.as_str(), config.port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
        }))
    }

    /// Require 220, then identify the client if configured
    fn handshake(mut session: Session, config: &Config, peer_addr: String) -> Result<Self> {
        let greeting = match Self::greet(&mut session, config) {
            Ok(greeting) => greeting,
            Err(e) => {
                session.release();
                return Err(e.into_connection());
            }
        };

        tracing::debug!("Connected to {}: {}", peer_addr, greeting.banner);

        Ok(Self {
            session: Mutex::new(session),
            greeting,
            reply_policy: config.reply_policy,
            peer_addr,
        })
    }

    fn greet(session: &mut Session, config: &Config) -> Result<Greeting> {
        let status = Status::read(&mut session.reader)?;
        if !status.is(codes::GREETING) {
            return Err(DictError::Connection(format!(
                "Expected greeting 220, got: {}",
                status
            )));
        }
        let greeting = Greeting::parse(status.detail());

        if let Some(name) = &config.client_name {
            let command = Command::Client { text: name.clone() };
            session.exchange(&command, config.reply_policy)?;
        }

        Ok(greeting)
    }

    /// Send QUIT and release the stream
    ///
    /// Never fails: every teardown error is discarded.
    pub fn close(mut self) {
        self.session.get_mut().teardown();
        tracing::debug!("Closed connection to {}", self.peer_addr);
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Send one command and decode its complete reply
    ///
    /// Holds the session lock until the reply has been fully consumed.
    pub fn execute(&self, command: &Command) -> Result<Reply> {
        let mut session = self.session.lock();
        session.exchange(command, self.reply_policy)
    }

    /// Like `execute`, but fails with `Busy` instead of waiting when another
    /// exchange is in flight
    pub fn try_execute(&self, command: &Command) -> Result<Reply> {
        let mut session = self.session.try_lock().ok_or(DictError::Busy)?;
        session.exchange(command, self.reply_policy)
    }

    /// All definitions of `word` in `database` (or a `*` / `!` selector)
    pub fn define(&self, word: &str, database: &Database) -> Result<Vec<Definition>> {
        let command = Command::Define {
            database: database.name.clone(),
            word: word.to_string(),
        };
        self.execute(&command)?.into_definitions()
    }

    /// Words matching `word` under `strategy`, first-seen order, no repeats
    pub fn match_words(
        &self,
        word: &str,
        strategy: &MatchingStrategy,
        database: &Database,
    ) -> Result<Vec<String>> {
        let command = Command::Match {
            database: database.name.clone(),
            strategy: strategy.name.clone(),
            word: word.to_string(),
        };
        self.execute(&command)?.into_matches()
    }

    /// Databases offered by the server, keyed by name
    pub fn databases(&self) -> Result<BTreeMap<String, Database>> {
        self.execute(&Command::ShowDatabases)?.into_databases()
    }

    /// Matching strategies offered by the server, in server order
    pub fn strategies(&self) -> Result<Vec<MatchingStrategy>> {
        self.execute(&Command::ShowStrategies)?.into_strategies()
    }

    /// Information text for one database; empty if the server does not know it
    pub fn database_info(&self, database: &Database) -> Result<String> {
        let command = Command::ShowInfo {
            database: database.name.clone(),
        };
        self.execute(&command)?.into_text()
    }

    /// SHOW SERVER text
    pub fn server_info(&self) -> Result<String> {
        self.execute(&Command::ShowServer)?.into_text()
    }

    /// HELP text
    pub fn help(&self) -> Result<String> {
        self.execute(&Command::Help)?.into_text()
    }

    /// STATUS detail (server timing line)
    pub fn status(&self) -> Result<String> {
        let status = self.execute(&Command::Status)?.into_status()?;
        Ok(status.detail().to_string())
    }

    /// Identify this client with CLIENT
    pub fn identify(&self, text: &str) -> Result<()> {
        let command = Command::Client {
            text: text.to_string(),
        };
        self.execute(&command)?.into_status()?;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn greeting(&self) -> &Greeting {
        &self.greeting
    }

    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// True once a protocol failure has made the session unusable
    pub fn is_poisoned(&self) -> bool {
        self.session.lock().poisoned
    }
}

impl Drop for DictConnection {
    fn drop(&mut self) {
        self.session.get_mut().teardown();
    }
}

impl Session {
    /// One full command/response cycle
    fn exchange(&mut self, command: &Command, policy: ReplyPolicy) -> Result<Reply> {
        if self.poisoned || self.closed {
            return Err(DictError::Poisoned);
        }

        let result = self.run(command, policy);
        if let Err(e) = &result {
            tracing::warn!("Session poisoned by {:?}: {}", command.command_type(), e);
            self.poisoned = true;
        }
        result
    }

    fn run(&mut self, command: &Command, policy: ReplyPolicy) -> Result<Reply> {
        if matches!(command, Command::Quit) {
            self.teardown();
            return Ok(Reply::Closed);
        }
        write_line(&mut self.writer, &command.to_line())?;

        let mut status = Status::read(&mut self.reader)?;
        if std::mem::take(&mut self.trailer_pending) && status.is(codes::OK) {
            tracing::trace!("Discarding trailing completion of previous SHOW INFO");
            status = Status::read(&mut self.reader)?;
        }

        let info_block = matches!(command, Command::ShowInfo { .. })
            && status.is(codes::DATABASE_INFO);

        let reply = decode_reply(command, status, &mut self.reader, policy)?;
        self.trailer_pending = info_block;
        Ok(reply)
    }

    /// QUIT, then release read end, write end and socket; errors discarded
    fn teardown(&mut self) {
        if self.closed {
            return;
        }
        let sent = write_line(&mut self.writer, &Command::Quit.to_line());
        if let Err(e) = sent {
            tracing::trace!("Ignoring QUIT failure: {}", e);
        }
        self.release();
    }

    fn release(&mut self) {
        self.closed = true;

        let reader = std::mem::replace(&mut self.reader, Box::new(io::empty()));
        drop(reader);

        let mut writer = std::mem::replace(&mut self.writer, Box::new(io::sink()));
        let flushed = writer.flush();
        drop(writer);
        if let Err(e) = flushed {
            tracing::trace!("Ignoring flush failure on close: {}", e);
        }

        if let Some(socket) = self.socket.take() {
            let shut = socket.shutdown(Shutdown::Both);
            if let Err(e) = shut {
                tracing::trace!("Ignoring shutdown failure on close: {}", e);
            }
        }
    }
}
