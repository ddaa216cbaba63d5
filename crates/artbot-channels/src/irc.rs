//! IRC channel: plain TCP client speaking RFC 1459 lines.
//!
//! Registers with `NICK`/`USER`, answers `PING`, joins the configured
//! channels once the server welcomes us, and turns `PRIVMSG` lines into
//! [`IncomingMessage`]s. Reconnecting is left to whoever runs the bot.

use artbot_core::ArtBotConfig;
use artbot_core::error::{ArtBotError, Result};
use artbot_core::traits::{Channel, LineSink};
use artbot_core::types::{IncomingMessage, OutgoingMessage};
use async_trait::async_trait;
use std::time::Duration;
use futures::stream::Stream;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// How long `disconnect` waits for the QUIT line to be written.
const QUIT_GRACE: Duration = Duration::from_secs(2);

/// IRC connection settings.
#[derive(Debug, Clone)]
pub struct IrcConfig {
    pub server: String,
    pub port: u16,
    pub nick: String,
    pub realname: String,
    /// Channels to join after registration.
    pub channels: Vec<String>,
}

impl IrcConfig {
    pub fn from_config(config: &ArtBotConfig) -> Self {
        Self {
            server: config.server.clone(),
            port: config.port,
            nick: config.nick.clone(),
            realname: config.nick.clone(),
            channels: vec![config.art_channel.clone(), config.tea_channel.clone()],
        }
    }
}

/// One parsed protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcMessage {
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
}

impl IrcMessage {
    /// Parse a raw line. Message tags are skipped. Returns `None` for blank
    /// or malformed input.
    pub fn parse(line: &str) -> Option<Self> {
        let mut rest = line.trim_end_matches(['\r', '\n']);

        if rest.starts_with('@') {
            rest = rest.split_once(' ')?.1;
        }

        let prefix = match rest.strip_prefix(':') {
            Some(stripped) => {
                let (prefix, tail) = stripped.split_once(' ')?;
                rest = tail;
                Some(prefix.to_string())
            }
            None => None,
        };

        let rest = rest.trim_start_matches(' ');
        let (command, mut rest) = match rest.split_once(' ') {
            Some((c, r)) => (c, r),
            None => (rest, ""),
        };
        if command.is_empty() {
            return None;
        }

        let mut params = Vec::new();
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            if let Some(trailing) = rest.strip_prefix(':') {
                params.push(trailing.to_string());
                break;
            }
            match rest.split_once(' ') {
                Some((p, r)) => {
                    params.push(p.to_string());
                    rest = r;
                }
                None => {
                    params.push(rest.to_string());
                    break;
                }
            }
        }

        Some(Self {
            prefix,
            command: command.to_ascii_uppercase(),
            params,
        })
    }

    /// Nick portion of a `nick!user@host` prefix.
    pub fn source_nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        Some(prefix.split_once('!').map_or(prefix, |(nick, _)| nick))
    }

    fn param(&self, i: usize) -> &str {
        self.params.get(i).map(String::as_str).unwrap_or("")
    }
}

/// Strip characters that would split one protocol line into several.
fn sanitize(text: &str) -> String {
    text.chars().filter(|c| *c != '\r' && *c != '\n' && *c != '\0').collect()
}

/// Format a `PRIVMSG`.
pub fn privmsg(target: &str, text: &str) -> String {
    format!("PRIVMSG {} :{}", sanitize(target), sanitize(text))
}

/// Cloneable handle that queues `PRIVMSG`s on the connection.
#[derive(Debug, Clone)]
pub struct IrcSender {
    tx: mpsc::UnboundedSender<String>,
}

impl IrcSender {
    pub fn raw(&self, line: String) -> Result<()> {
        self.tx
            .send(line)
            .map_err(|_| ArtBotError::ChannelNotConnected("irc".into()))
    }
}

impl LineSink for IrcSender {
    fn send_line(&self, target: &str, text: &str) {
        if self.raw(privmsg(target, text)).is_err() {
            tracing::warn!("IRC connection closed, dropped line for {target}");
        }
    }
}

/// IRC channel.
pub struct IrcChannel {
    config: IrcConfig,
    outbound_tx: Option<mpsc::UnboundedSender<String>>,
    inbound_rx: Option<mpsc::UnboundedReceiver<IncomingMessage>>,
    reader: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
}

impl IrcChannel {
    pub fn new(config: IrcConfig) -> Self {
        Self {
            config,
            outbound_tx: None,
            inbound_rx: None,
            reader: None,
            writer: None,
        }
    }

    /// Handle for queuing outgoing lines; fails before `connect`.
    pub fn sender(&self) -> Result<IrcSender> {
        self.outbound_tx
            .clone()
            .map(|tx| IrcSender { tx })
            .ok_or_else(|| ArtBotError::ChannelNotConnected("irc".into()))
    }

    /// Run the protocol over an already-open byte stream.
    pub fn attach<R, W>(&mut self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();

        out_tx
            .send(format!("NICK {}", self.config.nick))
            .and_then(|_| out_tx.send(format!("USER {} 0 * :{}", self.config.nick, self.config.realname)))
            .map_err(|_| ArtBotError::channel("outbound queue closed during registration"))?;

        self.writer = Some(tokio::spawn(write_loop(writer, out_rx)));
        self.reader = Some(tokio::spawn(read_loop(
            reader,
            self.config.clone(),
            out_tx.clone(),
            in_tx,
        )));
        self.outbound_tx = Some(out_tx);
        self.inbound_rx = Some(in_rx);
        Ok(())
    }
}

async fn write_loop<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<String>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        tracing::trace!("IRC >> {line}");
        let framed = format!("{line}\r\n");
        if let Err(e) = writer.write_all(framed.as_bytes()).await {
            tracing::error!("IRC write failed: {e}");
            return;
        }
        if let Err(e) = writer.flush().await {
            tracing::error!("IRC flush failed: {e}");
            return;
        }
    }
    let _ = writer.shutdown().await;
}

async fn read_loop<R>(
    reader: R,
    config: IrcConfig,
    out_tx: mpsc::UnboundedSender<String>,
    in_tx: mpsc::UnboundedSender<IncomingMessage>,
) where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::with_capacity(512);
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                tracing::warn!("IRC connection closed by server");
                return;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("IRC read failed: {e}");
                return;
            }
        }
        // Servers relay whatever bytes clients send; not every line is UTF-8.
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\r', '\n']);
        tracing::trace!("IRC << {line}");

        let Some(msg) = IrcMessage::parse(line) else {
            tracing::debug!("Ignoring malformed IRC line: {line:?}");
            continue;
        };
        let nick = msg.source_nick().unwrap_or("").to_string();

        match msg.command.as_str() {
            "PING" => {
                let _ = out_tx.send(format!("PONG :{}", msg.param(0)));
            }
            // RPL_WELCOME
            "001" => {
                tracing::info!("Signed on to {} as {}", config.server, config.nick);
                for channel in &config.channels {
                    tracing::info!("Channel: {channel}");
                    let _ = out_tx.send(format!("JOIN {channel}"));
                }
            }
            // ERR_NICKNAMEINUSE
            "433" => {
                tracing::error!("Nickname {} is already in use", config.nick);
            }
            "PRIVMSG" => {
                let incoming = IncomingMessage::new(msg.param(0), nick, msg.param(1));
                if in_tx.send(incoming).is_err() {
                    tracing::info!("IRC stream closed (receiver dropped)");
                    return;
                }
            }
            "JOIN" => tracing::info!("Joined: {} {nick}", msg.param(0)),
            "PART" => tracing::info!("Left: {} {nick}", msg.param(0)),
            "QUIT" => tracing::info!("Quit: {nick}"),
            "NICK" => tracing::info!("{nick} has been renamed to {}", msg.param(0)),
            "ERROR" => {
                tracing::warn!("IRC server error: {}", msg.param(0));
            }
            _ => {}
        }
    }
}

#[async_trait]
impl Channel for IrcChannel {
    fn name(&self) -> &str { "irc" }

    async fn connect(&mut self) -> Result<()> {
        let addr = (self.config.server.as_str(), self.config.port);
        let stream = TcpStream::connect(addr).await.map_err(|e| {
            ArtBotError::channel(format!(
                "connect to {}:{} failed: {e}",
                self.config.server, self.config.port
            ))
        })?;
        tracing::info!("Connected to {}:{}", self.config.server, self.config.port);
        let (reader, writer) = stream.into_split();
        self.attach(reader, writer)
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(tx) = self.outbound_tx.take() {
            let _ = tx.send("QUIT :Happy painting".into());
        }
        self.inbound_rx = None;
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        // Outstanding IrcSender clones keep the writer alive; give the QUIT
        // a moment to go out, then stop it.
        if let Some(mut writer) = self.writer.take() {
            if tokio::time::timeout(QUIT_GRACE, &mut writer).await.is_err() {
                writer.abort();
            }
        }
        tracing::info!("Disconnected from {}", self.config.server);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.outbound_tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    async fn send(&self, message: OutgoingMessage) -> Result<()> {
        self.sender()?.raw(privmsg(&message.target, &message.content))
    }

    async fn listen(&mut self) -> Result<Box<dyn Stream<Item = IncomingMessage> + Send + Unpin>> {
        let rx = self
            .inbound_rx
            .take()
            .ok_or_else(|| ArtBotError::channel("IRC stream already taken or not connected"))?;
        Ok(Box::new(UnboundedReceiverStream::new(rx)))
    }
}
