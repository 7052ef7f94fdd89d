use std::time::Duration;

use rand::Rng;

use crate::common::Message;

/// Phrases the simulated peer rotates through.
pub const REPLY_PHRASES: [&str; 5] = [
    "E aí, tudo bem? Que legal você falar sobre isso!",
    "O que você achou do último jogo?",
    "To preparando um vídeo novo sobre isso, vai ficar incrível!",
    "Valeu pela mensagem! Vou abordar esse tema em breve.",
    "Show! Continue acompanhando que vem mais conteúdo por aí!",
];

/// Picks the delay and wording of each simulated reply. Delays are
/// drawn independently per send, so two pending replies may land out
/// of send order.
#[derive(Debug, Clone)]
pub struct Responder {
    peer_name: String,
    delay_min_ms: u64,
    delay_max_ms: u64,
}

impl Responder {
    pub fn new(peer_name: impl Into<String>, delay_min_ms: u64, delay_max_ms: u64) -> Self {
        Self {
            peer_name: peer_name.into(),
            delay_min_ms,
            delay_max_ms,
        }
    }

    pub fn peer_name(&self) -> &str {
        &self.peer_name
    }

    /// Uniform delay from the configured window.
    pub fn sample_delay(&self) -> Duration {
        let ms = if self.delay_max_ms > self.delay_min_ms {
            rand::thread_rng().gen_range(self.delay_min_ms..self.delay_max_ms)
        } else {
            self.delay_min_ms
        };
        Duration::from_millis(ms)
    }

    /// One inbound reply with a phrase chosen uniformly at random.
    pub fn reply(&self) -> Message {
        let text = REPLY_PHRASES[rand::thread_rng().gen_range(0..REPLY_PHRASES.len())];
        Message::inbound(&self.peer_name, text)
    }
}
