use itertools::Itertools;
use log::debug;
use rand::Rng;
use thiserror::Error;

use crate::variant::Variant;

/// Characters a token is drawn from. No whitespace, so tokens never split.
pub const ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789^%$&@!?#";

/// Token lengths of the guaranteed-short fallback text
pub const FALLBACK_TOKEN_LENS: [usize; 4] = [10, 8, 7, 6];

/// Something that can tell how tall a piece of text renders
pub trait TextMeasure {
    /// Rows the text occupies once laid out in the container
    fn content_height(&self, text: &str) -> u16;
    /// Rows the container can show
    fn visible_height(&self) -> u16;
    /// Extra rows a candidate may overflow by and still count as fitting
    fn tolerance(&self) -> u16 {
        0
    }

    fn fits(&self, text: &str) -> bool {
        self.content_height(text) <= self.visible_height().saturating_add(self.tolerance())
    }
}

/// No candidate fit within the attempt budget; carries the short substitute
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no candidate fit after retries, substituted `{0}`")]
pub struct FallbackUsed(pub String);

impl FallbackUsed {
    pub fn into_text(self) -> String {
        self.0
    }
}

/// Sampling bounds for one round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenParams {
    pub max_attempts: usize,
    pub tokens_min: usize,
    pub tokens_max: usize,
    pub token_len_min: usize,
    pub token_len_max: usize,
}

impl GenParams {
    /// Difficulty grows every two rounds up to the variant's cap.
    pub fn for_round(variant: Variant, round: u32) -> Self {
        let step = (round / 2) as usize;
        match variant {
            Variant::Mac => Self {
                max_attempts: 50,
                tokens_min: 3,
                tokens_max: (6 + step).min(10),
                token_len_min: 5,
                token_len_max: (12 + step).min(20),
            },
            Variant::Windows => Self {
                max_attempts: 40,
                tokens_min: 3,
                tokens_max: (6 + step).min(9),
                token_len_min: 5,
                token_len_max: (12 + step).min(18),
            },
            Variant::Selection => Self {
                max_attempts: 40,
                tokens_min: 3,
                tokens_max: 8,
                token_len_min: 5,
                token_len_max: 14,
            },
        }
    }
}

pub fn make_token<R: Rng>(len: usize, rng: &mut R) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

fn candidate<R: Rng>(params: &GenParams, rng: &mut R) -> String {
    let count = rng.gen_range(params.tokens_min..=params.tokens_max);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(params.token_len_min..=params.token_len_max);
            make_token(len, rng)
        })
        .join(" ")
}

pub fn fallback_text<R: Rng>(rng: &mut R) -> String {
    FALLBACK_TOKEN_LENS
        .iter()
        .map(|&len| make_token(len, rng))
        .join(" ")
}

/// Sample candidates until one fits the container.
///
/// Returns the first fitting candidate, or `Err(FallbackUsed)` holding a
/// short four-token string once `max_attempts` candidates have overflowed.
pub fn generate_fit<M, R>(
    params: &GenParams,
    measure: &M,
    rng: &mut R,
) -> Result<String, FallbackUsed>
where
    M: TextMeasure + ?Sized,
    R: Rng,
{
    for attempt in 0..params.max_attempts {
        let text = candidate(params, rng);
        if measure.fits(&text) {
            debug!("candidate fit on attempt {}", attempt + 1);
            return Ok(text);
        }
    }

    debug!(
        "no candidate fit in {} attempts (visible height {})",
        params.max_attempts,
        measure.visible_height()
    );
    Err(FallbackUsed(fallback_text(rng)))
}

/// Like `generate_fit`, but always hands back text.
pub fn generate_target<M, R>(params: &GenParams, measure: &M, rng: &mut R) -> String
where
    M: TextMeasure + ?Sized,
    R: Rng,
{
    generate_fit(params, measure, rng).unwrap_or_else(FallbackUsed::into_text)
}
