//! Game instance name generation
//!
//! Freshly provisioned game instances get a readable two-word name like
//! `Epic Quest` or `Silent Odyssey`, built from adventure-themed word
//! banks. Hosts typically embed the name in the channel they create for
//! the instance.

use heck::ToTitleCase;
use petname::{Generator, Petnames};

/// Adjectives used for instance names
const ADJECTIVES: &str = "epic mysterious golden cosmic legendary hidden ancient magical \
                          swift brave clever wild silent bright dark fierce gentle wise \
                          quick strong calm bold shiny rare";

/// Nouns used for instance names
const NOUNS: &str = "quest adventure journey challenge mission voyage expedition trial \
                     test battle race hunt discovery exploration puzzle mystery treasure \
                     legend tale story saga chronicle odyssey";

/// Generates a random two-word instance name, title-cased
pub fn generate_game_name() -> String {
    let petnames = Petnames::new(ADJECTIVES, ADJECTIVES, NOUNS);
    loop {
        if let Some(name) = petnames.generate_one(2, " ") {
            return name.to_title_case();
        }
    }
}
