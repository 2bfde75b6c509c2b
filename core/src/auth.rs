use crate::error::{LedgerError, Result};

/// Decides whether a presented credential unlocks the ledger.
pub trait CredentialCheck {
    fn verify(&self, candidate: &str) -> bool;

    fn authorize(&self, candidate: Option<&str>) -> Result<()> {
        if self.verify(candidate.unwrap_or_default()) {
            Ok(())
        } else {
            Err(LedgerError::AccessDenied)
        }
    }
}

/// Owner PIN gate. With no PIN configured every candidate is accepted.
#[derive(Debug, Clone)]
pub struct PinGate {
    pin: Option<String>,
}

impl PinGate {
    pub fn new(pin: impl Into<String>) -> Self {
        Self {
            pin: Some(pin.into()),
        }
    }

    pub fn open() -> Self {
        Self { pin: None }
    }

    pub fn from_config(pin: Option<&str>) -> Self {
        match pin.filter(|p| !p.is_empty()) {
            Some(p) => Self::new(p),
            None => Self::open(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.pin.is_none()
    }
}

impl CredentialCheck for PinGate {
    fn verify(&self, candidate: &str) -> bool {
        match &self.pin {
            None => true,
            Some(pin) => constant_time_eq(pin.as_bytes(), candidate.as_bytes()),
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
