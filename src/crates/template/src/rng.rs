use rand::distributions::Alphanumeric;
use rand::Rng as _;
use uuid::Uuid;

/// Injected RNG capability backing the `random.*` template namespace.
pub trait Rng: Send + Sync {
    fn uuid(&self) -> Uuid;
    fn alphabetic(&self, n: usize) -> String;
    fn numeric(&self, n: usize) -> String;
    fn alphanumeric(&self, n: usize) -> String;
    fn any(&self, n: usize) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const PRINTABLE: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";

fn sample(alphabet: &[u8], n: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

impl Rng for SystemRng {
    fn uuid(&self) -> Uuid {
        Uuid::new_v4()
    }

    fn alphabetic(&self, n: usize) -> String {
        sample(ALPHABET, n)
    }

    fn numeric(&self, n: usize) -> String {
        sample(DIGITS, n)
    }

    fn alphanumeric(&self, n: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(n)
            .map(char::from)
            .collect()
    }

    fn any(&self, n: usize) -> String {
        sample(PRINTABLE, n)
    }
}

/// Deterministic RNG for tests: every call returns a fixed, seeded value.
#[derive(Debug, Clone)]
pub struct FixedRng {
    pub uuid: Uuid,
    pub fill: char,
}

impl Default for FixedRng {
    fn default() -> Self {
        Self {
            uuid: Uuid::nil(),
            fill: 'x',
        }
    }
}

impl Rng for FixedRng {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn alphabetic(&self, n: usize) -> String {
        self.fill.to_string().repeat(n)
    }

    fn numeric(&self, n: usize) -> String {
        "0".repeat(n)
    }

    fn alphanumeric(&self, n: usize) -> String {
        self.fill.to_string().repeat(n)
    }

    fn any(&self, n: usize) -> String {
        self.fill.to_string().repeat(n)
    }
}
