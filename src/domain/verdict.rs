use std::fmt;

/// Gateway answer to an echo-back validation request.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Verdict {
    Confirmed,
    Pending,
    Invalid,
    Unrecognized,
}

impl Verdict {
    /// Maps a Payhere status code: 2 completed, 0 pending, negative failed.
    pub fn from_status_code(code: i32) -> Self {
        match code {
            2 => Verdict::Confirmed,
            0 => Verdict::Pending,
            c if c < 0 => Verdict::Invalid,
            _ => Verdict::Unrecognized,
        }
    }

    /// Interprets the synchronous body returned by the echo endpoint.
    ///
    /// A single word (`VERIFIED`, `SUCCESS`, `INVALID`, `FAIL`) only vouches
    /// for the authenticity of the notification: once verified, the outcome
    /// follows `notified_status`, the status code the notification itself
    /// carried. A bare status code, or a `status_code=N` line among
    /// `key=value` data-transfer lines, is taken as the outcome directly.
    pub fn from_echo_response(body: &str, notified_status: Option<i32>) -> Self {
        let Some(first) = body.lines().map(str::trim).find(|l| !l.is_empty()) else {
            return Verdict::Unrecognized;
        };

        if let Ok(code) = first.parse::<i32>() {
            return Verdict::from_status_code(code);
        }

        match first.to_ascii_uppercase().as_str() {
            "VERIFIED" | "SUCCESS" => {
                return notified_status.map_or(Verdict::Unrecognized, Verdict::from_status_code);
            }
            "INVALID" | "FAIL" => return Verdict::Invalid,
            "PENDING" => return Verdict::Pending,
            _ => {}
        }

        body.lines()
            .filter_map(|line| line.trim().split_once('='))
            .find(|(key, _)| key.trim() == "status_code")
            .and_then(|(_, value)| value.trim().parse::<i32>().ok())
            .map_or(Verdict::Unrecognized, Verdict::from_status_code)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Confirmed => "confirmed",
            Verdict::Pending => "pending",
            Verdict::Invalid => "invalid",
            Verdict::Unrecognized => "unrecognized",
        };
        f.write_str(s)
    }
}
