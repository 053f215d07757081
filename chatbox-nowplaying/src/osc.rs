use std::net::SocketAddr;

use async_trait::async_trait;
use rosc::{OscMessage, OscPacket, OscType, encoder};
use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::error::OscError;

pub const CHATBOX_INPUT_ADDRESS: &str = "/chatbox/input";

/// Where rendered statuses go. Sends are fire-and-forget.
#[async_trait(?Send)]
pub trait ChatboxSink {
    async fn send(&self, text: &str) -> Result<(), OscError>;
}

/// Sends `/chatbox/input (text, true, false)` over UDP: publish immediately,
/// without the notification sound.
pub struct OscChatbox {
    socket: UdpSocket,
    target: SocketAddr,
}

impl OscChatbox {
    pub async fn connect(target: SocketAddr) -> Result<Self, OscError> {
        let bind_addr: SocketAddr = if target.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };

        let socket = UdpSocket::bind(bind_addr).await?;
        info!("OSC client ready, sending to {target}");

        Ok(Self { socket, target })
    }
}

pub fn encode_chatbox_message(text: &str) -> Result<Vec<u8>, OscError> {
    let packet = OscPacket::Message(OscMessage {
        addr: CHATBOX_INPUT_ADDRESS.to_string(),
        args: vec![
            OscType::String(text.to_string()),
            OscType::Bool(true),
            OscType::Bool(false),
        ],
    });

    Ok(encoder::encode(&packet)?)
}

#[async_trait(?Send)]
impl ChatboxSink for OscChatbox {
    async fn send(&self, text: &str) -> Result<(), OscError> {
        let bytes = encode_chatbox_message(text)?;
        self.socket.send_to(&bytes, self.target).await?;
        debug!("Sent chatbox status: {text}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rosc::decoder;

    use super::*;

    #[test]
    fn message_layout() {
        let bytes = encode_chatbox_message("A - T (0:00/3:20)").unwrap();
        let (_, packet) = decoder::decode_udp(&bytes).unwrap();

        match packet {
            OscPacket::Message(msg) => {
                assert_eq!(msg.addr, "/chatbox/input");
                assert_eq!(
                    msg.args,
                    vec![
                        OscType::String("A - T (0:00/3:20)".to_string()),
                        OscType::Bool(true),
                        OscType::Bool(false),
                    ]
                );
            }
            other => panic!("unexpected packet {other:?}"),
        }
    }

    #[tokio::test]
    async fn sends_datagram_to_target() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = receiver.local_addr().unwrap();

        let chatbox = OscChatbox::connect(target).await.unwrap();
        chatbox.send("Nothing playing").await.unwrap();

        let mut buf = [0u8; 1024];
        let (len, _) = receiver.recv_from(&mut buf).await.unwrap();
        let (_, packet) = decoder::decode_udp(&buf[..len]).unwrap();

        let OscPacket::Message(msg) = packet else {
            panic!("expected a message");
        };
        assert_eq!(msg.args[0], OscType::String("Nothing playing".to_string()));
    }
}
