//! International Morse code conversion.

use tracing::debug;

use super::SERVICES_TARGET;

/// Converts between plain text and Morse code.
pub trait MorseCodec: Send + Sync {
    /// Encodes text. Symbols are separated by spaces and words by ` / `.
    fn encode(&self, text: &str) -> String;

    /// Decodes Morse code into uppercase text. Unknown symbols become `?`.
    fn decode(&self, code: &str) -> String;
}

/// ITU-R M.1677-1 letters, figures and punctuation.
const INTERNATIONAL: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('_', "..--.-"),
    ('"', ".-..-."),
    ('$', "...-..-"),
    ('@', ".--.-."),
];

const WORD_SEPARATOR: &str = " / ";
const UNKNOWN_SYMBOL: char = '?';

/// Table-driven International Morse codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct InternationalMorse;

impl InternationalMorse {
    /// Builds the codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn symbol_for(character: char) -> Option<&'static str> {
        let upper = character.to_ascii_uppercase();
        INTERNATIONAL
            .iter()
            .find(|(letter, _)| *letter == upper)
            .map(|(_, code)| *code)
    }

    fn letter_for(symbol: &str) -> char {
        INTERNATIONAL
            .iter()
            .find(|(_, code)| *code == symbol)
            .map_or(UNKNOWN_SYMBOL, |(letter, _)| *letter)
    }
}

impl MorseCodec for InternationalMorse {
    fn encode(&self, text: &str) -> String {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|word| {
                word.chars()
                    .filter_map(|character| {
                        let symbol = Self::symbol_for(character);
                        if symbol.is_none() {
                            debug!(
                                target: SERVICES_TARGET,
                                character = %character,
                                "dropping character without a Morse symbol"
                            );
                        }
                        symbol
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|word| !word.is_empty())
            .collect();
        words.join(WORD_SEPARATOR)
    }

    fn decode(&self, code: &str) -> String {
        let words: Vec<String> = code
            .split('/')
            .map(|word| word.split_whitespace().map(Self::letter_for).collect::<String>())
            .filter(|word| !word.is_empty())
            .collect();
        words.join(" ")
    }
}
