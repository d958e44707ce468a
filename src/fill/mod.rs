//! Dictionary fill service
//!
//! Consults an online English-Chinese dictionary to populate missing
//! translations and example sentences before scheduling begins. The
//! scheduler itself never touches this module; it only sees the filled-in
//! item table.

use std::time::Duration;

use rand::Rng;
use regex::Regex;
use thiserror::Error;

use crate::quiz::Item;

const BASE_URL: &str = "https://dictionary.cambridge.org/dictionary/english-chinese-traditional/";

/// Consecutive lookup failures before a checkpoint save
const CHECKPOINT_AFTER_ERRORS: u32 = 5;

#[derive(Error, Debug)]
pub enum FillError {
    #[error("request timed out")]
    Timeout,

    #[error("blocked by the dictionary site (bot interstitial)")]
    Blocked,

    #[error("no dictionary entry found")]
    NotFound,

    #[error("headword mismatch: page shows '{page}', looked up '{requested}'")]
    Mismatch { page: String, requested: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, FillError>;

/// Fields a lookup can fill in
#[derive(Debug, Clone, Default)]
pub struct FillOutcome {
    pub translation: Option<String>,
    pub sentence: Option<String>,
}

/// A source of `{translation, sentence}` fill-ins for a vocabulary word
pub trait FillService {
    fn lookup(&self, word: &str) -> Result<FillOutcome>;
}

/// Scrapes the Cambridge dictionary entry page for a word
pub struct DictionaryClient {
    client: reqwest::blocking::Client,
    base_url: String,
    headword: Regex,
    translation: Regex,
    sentence: Regex,
    tags: Regex,
}

impl DictionaryClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("Mozilla/5.0 (compatible; recall/0.3)")
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            headword: Regex::new(r#"<span class="hw dhw">([^<]+)</span>"#).unwrap(),
            translation: Regex::new(r#"<span class="dtrans[^"]*"[^>]*>([^<]+)"#).unwrap(),
            sentence: Regex::new(r#"(?s)<span class="eg deg"[^>]*>(.*?)</span>"#).unwrap(),
            tags: Regex::new(r"<[^>]+>").unwrap(),
        })
    }

    fn extract_headword<'a>(&self, html: &'a str) -> Option<&'a str> {
        self.headword
            .captures(html)
            .map(|caps| caps.get(1).unwrap().as_str())
    }

    fn extract_translation(&self, html: &str) -> Option<String> {
        self.translation
            .captures(html)
            .map(|caps| caps.get(1).unwrap().as_str().trim().to_string())
            .filter(|text| !text.is_empty())
    }

    fn extract_sentence(&self, html: &str) -> Option<String> {
        let raw = self
            .sentence
            .captures(html)
            .map(|caps| caps.get(1).unwrap().as_str())?;

        let stripped = self.tags.replace_all(raw, " ");
        let full = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
        if full.is_empty() {
            return None;
        }

        // Keep only the first sentence
        let cut = if let Some(position) = full.find('。') {
            format!("{}。", full[..position].trim_end())
        } else if let Some(position) = full.find('.') {
            format!("{}.", full[..position].trim_end())
        } else {
            full
        };
        Some(cut)
    }

    fn parse_entry(&self, word: &str, html: &str) -> Result<FillOutcome> {
        let lowered = html.to_lowercase();
        if lowered.contains("are you a human") || lowered.contains("verify you are a human") {
            return Err(FillError::Blocked);
        }

        let headword = self.extract_headword(html).ok_or(FillError::NotFound)?;
        let page = headword.trim().to_lowercase();
        let requested = word.trim().to_lowercase();
        if page != requested {
            return Err(FillError::Mismatch { page, requested });
        }

        Ok(FillOutcome {
            translation: self.extract_translation(html),
            sentence: self.extract_sentence(html),
        })
    }
}

impl FillService for DictionaryClient {
    fn lookup(&self, word: &str) -> Result<FillOutcome> {
        let url = format!("{}{}", self.base_url, word);
        let response = self.client.get(&url).send().map_err(|error| {
            if error.is_timeout() {
                FillError::Timeout
            } else {
                FillError::Http(error)
            }
        })?;

        let html = response.text().map_err(FillError::Http)?;
        self.parse_entry(word, &html)
    }
}

/// Summary of a fill pass
#[derive(Debug, Clone, Copy, Default)]
pub struct FillReport {
    pub looked_up: u32,
    pub filled: u32,
    pub errors: u32,
}

/// Walk the item table and fill empty translation/sentence fields.
///
/// Lookup failures never abort the pass; after five consecutive failures the
/// checkpoint callback runs so progress survives a ban. With `polite` set, a
/// randomized 2-4s pause separates requests.
pub fn fill_missing<F>(
    service: &dyn FillService,
    items: &mut [Item],
    polite: bool,
    mut checkpoint: F,
) -> FillReport
where
    F: FnMut(&[Item]),
{
    let mut report = FillReport::default();
    let mut consecutive_errors = 0u32;
    let total = items.len();

    for index in 0..total {
        let word = items[index].voc.trim().to_string();
        if word.is_empty() {
            continue;
        }
        let needs_translation = items[index].translation.is_empty();
        let needs_sentence = items[index].sentence.is_empty();
        if !needs_translation && !needs_sentence {
            continue;
        }

        report.looked_up += 1;
        let mut filled = false;
        match service.lookup(&word) {
            Ok(outcome) => {
                log::info!("{}/{} {}: entry found", index + 1, total, word);
                if needs_translation {
                    if let Some(translation) = outcome.translation {
                        items[index].translation = translation;
                        filled = true;
                    }
                }
                if needs_sentence {
                    if let Some(sentence) = outcome.sentence {
                        items[index].sentence = sentence;
                        filled = true;
                    }
                }
                if filled {
                    report.filled += 1;
                }
            }
            Err(error) => {
                log::warn!("{}/{} {}: {}", index + 1, total, word, error);
                report.errors += 1;
            }
        }

        if filled {
            consecutive_errors = 0;
        } else {
            consecutive_errors += 1;
            if consecutive_errors >= CHECKPOINT_AFTER_ERRORS {
                checkpoint(items);
                consecutive_errors = 0;
            }
        }

        if polite {
            let pause = rand::thread_rng().gen_range(2.0..4.0);
            std::thread::sleep(Duration::from_secs_f64(pause));
        }
    }

    checkpoint(items);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = r#"
        <div class="entry-body__el">
          <span class="hw dhw">run</span>
          <span class="dtrans dtrans-se">跑；奔跑</span>
          <span class="eg deg">She <b>runs</b> every morning. More text here.</span>
        </div>"#;

    fn client() -> DictionaryClient {
        DictionaryClient::with_base_url("http://localhost/").unwrap()
    }

    #[test]
    fn test_parse_entry_extracts_fields() {
        let outcome = client().parse_entry("Run ", ENTRY).unwrap();
        assert_eq!(outcome.translation.as_deref(), Some("跑；奔跑"));
        assert_eq!(outcome.sentence.as_deref(), Some("She runs every morning."));
    }

    #[test]
    fn test_parse_entry_detects_mismatch() {
        let result = client().parse_entry("ran", ENTRY);
        assert!(matches!(result, Err(FillError::Mismatch { .. })));
    }

    #[test]
    fn test_parse_entry_detects_missing_headword() {
        let result = client().parse_entry("run", "<html>nothing here</html>");
        assert!(matches!(result, Err(FillError::NotFound)));
    }

    #[test]
    fn test_parse_entry_detects_bot_interstitial() {
        let result = client().parse_entry("run", "<p>Are you a human?</p>");
        assert!(matches!(result, Err(FillError::Blocked)));
    }

    struct StubService {
        outcome: std::result::Result<(), ()>,
    }

    impl FillService for StubService {
        fn lookup(&self, _: &str) -> Result<FillOutcome> {
            match self.outcome {
                Ok(()) => Ok(FillOutcome {
                    translation: Some("跑".to_string()),
                    sentence: Some("Run fast.".to_string()),
                }),
                Err(()) => Err(FillError::NotFound),
            }
        }
    }

    fn blank_item(word: &str) -> Item {
        Item {
            voc: word.to_string(),
            memorize: "hint".to_string(),
            ..Item::default()
        }
    }

    #[test]
    fn test_fill_missing_populates_empty_fields_only() {
        let mut items = vec![blank_item("run"), blank_item("walk")];
        items[1].translation = "走".to_string();
        items[1].sentence = "Walk slowly.".to_string();

        let service = StubService { outcome: Ok(()) };
        let report = fill_missing(&service, &mut items, false, |_| {});

        assert_eq!(report.looked_up, 1);
        assert_eq!(report.filled, 1);
        assert_eq!(items[0].translation, "跑");
        assert_eq!(items[0].sentence, "Run fast.");
        // Already-complete item untouched
        assert_eq!(items[1].translation, "走");
    }

    #[test]
    fn test_fill_missing_checkpoints_after_consecutive_errors() {
        let mut items: Vec<Item> = (0..7).map(|i| blank_item(&format!("w{}", i))).collect();
        let service = StubService { outcome: Err(()) };

        let mut checkpoints = 0;
        let report = fill_missing(&service, &mut items, false, |_| checkpoints += 1);

        assert_eq!(report.errors, 7);
        // One mid-pass checkpoint at five failures, plus the final save
        assert_eq!(checkpoints, 2);
    }
}
