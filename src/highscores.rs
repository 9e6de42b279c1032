//! Remote high score service
//!
//! One global best score lives behind `GET`/`POST /api/highscore`. The game
//! never waits on it: failures are logged and replaced with a fallback so the
//! title and game over screens always have something to show.

use serde::{Deserialize, Serialize};

/// Default service endpoint, relative to the page
pub const DEFAULT_ENDPOINT: &str = "/api/highscore";

/// Wire body for both the request and the response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScoreBody {
    #[serde(default)]
    pub score: u64,
}

/// Parse a service response; a missing `score` field reads as 0
pub fn parse_high_score(json: &str) -> Result<u64, serde_json::Error> {
    let body: ScoreBody = serde_json::from_str(json)?;
    Ok(body.score)
}

/// Serialize the body posted at game over
pub fn submission_body(score: u64) -> String {
    // Serializing a plain integer struct cannot fail
    serde_json::to_string(&ScoreBody { score }).unwrap_or_else(|_| format!("{{\"score\":{score}}}"))
}

/// What the host knows about the global high score
#[derive(Debug, Clone, Default)]
pub struct HighScoreBoard {
    /// Best score reported by the service (or the fallback)
    pub global: u64,
    /// Score has already been posted for the current game over
    pub submitted: bool,
    /// Result shown on the game over screen once the post resolves
    pub last_result: Option<u64>,
}

impl HighScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the single submission allowed per game over.
    /// Returns false if it was already claimed.
    pub fn begin_submission(&mut self) -> bool {
        if self.submitted {
            return false;
        }
        self.submitted = true;
        self.last_result = None;
        true
    }

    /// Clear the submission flag when a new run starts
    pub fn reset_for_new_game(&mut self) {
        self.submitted = false;
        self.last_result = None;
    }

    /// Apply the startup fetch, falling back to 0
    pub fn resolve_fetch<E: std::fmt::Display>(&mut self, result: Result<u64, E>) -> u64 {
        self.global = match result {
            Ok(score) => score,
            Err(e) => {
                log::warn!("Failed to fetch high score: {e}");
                0
            }
        };
        self.global
    }

    /// Apply the game over post, falling back to the local score
    pub fn resolve_submit<E: std::fmt::Display>(&mut self, result: Result<u64, E>, local: u64) -> u64 {
        let score = match result {
            Ok(score) => {
                self.global = score;
                score
            }
            Err(e) => {
                log::warn!("Failed to submit high score: {e}");
                local
            }
        };
        self.last_result = Some(score);
        score
    }
}

#[cfg(target_arch = "wasm32")]
mod remote {
    use super::{parse_high_score, submission_body};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    async fn read_score(request: &Request) -> Result<u64, JsValue> {
        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let resp: Response = JsFuture::from(window.fetch_with_request(request))
            .await?
            .dyn_into()?;
        if !resp.ok() {
            return Err(js_err(format!("HTTP {}", resp.status())));
        }
        let text = JsFuture::from(resp.text()?).await?;
        let text = text.as_string().unwrap_or_default();
        parse_high_score(&text).map_err(js_err)
    }

    /// `GET` the current global high score
    pub async fn fetch_high_score(url: &str) -> Result<u64, JsValue> {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);
        let request = Request::new_with_str_and_init(url, &opts)?;
        read_score(&request).await
    }

    /// `POST` a finished game's score; the service answers with the best
    pub async fn submit_high_score(url: &str, score: u64) -> Result<u64, JsValue> {
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&submission_body(score)));
        let request = Request::new_with_str_and_init(url, &opts)?;
        request.headers().set("Content-Type", "application/json")?;
        read_score(&request).await
    }
}

#[cfg(target_arch = "wasm32")]
pub use remote::{fetch_high_score, submit_high_score};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        assert_eq!(parse_high_score(r#"{"score":42}"#).unwrap(), 42);
        assert_eq!(parse_high_score(r#"{}"#).unwrap(), 0);
        assert_eq!(parse_high_score(r#"{"score":7,"name":"x"}"#).unwrap(), 7);
        assert!(parse_high_score("not json").is_err());
    }

    #[test]
    fn test_submission_body() {
        assert_eq!(submission_body(13), r#"{"score":13}"#);
    }

    #[test]
    fn test_fetch_fallback_is_zero() {
        let mut board = HighScoreBoard::new();
        board.global = 99;
        assert_eq!(board.resolve_fetch::<String>(Err("offline".into())), 0);
        assert_eq!(board.global, 0);
        assert_eq!(board.resolve_fetch::<String>(Ok(120)), 120);
    }

    #[test]
    fn test_submit_once_per_game_over() {
        let mut board = HighScoreBoard::new();
        assert!(board.begin_submission());
        assert!(!board.begin_submission());
        board.reset_for_new_game();
        assert!(board.begin_submission());
    }

    #[test]
    fn test_submit_fallback_is_local_score() {
        let mut board = HighScoreBoard::new();
        board.global = 50;
        assert_eq!(board.resolve_submit::<String>(Err("timeout".into()), 12), 12);
        assert_eq!(board.global, 50);
        assert_eq!(board.last_result, Some(12));

        assert_eq!(board.resolve_submit::<String>(Ok(64), 12), 64);
        assert_eq!(board.global, 64);
    }
}
