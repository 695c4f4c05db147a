//! services/api/src/adapters/greeting.rs

use blog_core::ports::GreetingSource;
use rand::seq::SliceRandom;

pub const GREETINGS: [&str; 5] = [
    "Bienvenue to the Montreal Explorer backend 👋",
    "Exploring the city one API at a time 🗺️",
    "Backend running smoothly in Eastern Time ⚙️",
    "Data loves structure, and Rust delivers it! 🧠",
    "Keep your endpoints clean and your coffee strong ☕",
];

/// Picks a greeting uniformly at random from [`GREETINGS`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticGreetings;

impl GreetingSource for StaticGreetings {
    fn pick(&self) -> String {
        GREETINGS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(GREETINGS[0])
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_from_the_fixed_set() {
        for _ in 0..50 {
            let greeting = StaticGreetings.pick();
            assert!(GREETINGS.contains(&greeting.as_str()));
        }
    }
}
