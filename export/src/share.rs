use vibewave_core::Mood;

/// Initial state requested via query-string parameters. Invalid or
/// out-of-range values are silently ignored, leaving the defaults in place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InitialConfig {
    pub mood: Mood,
    pub frequency: f32,
    pub volatility: f32,
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            mood: Mood::Optimistic,
            frequency: 1.0,
            volatility: 0.0,
        }
    }
}

pub fn valid_frequency(frequency: f32) -> bool {
    frequency > 0.0 && frequency < 10.0
}

pub fn valid_volatility(volatility: f32) -> bool {
    (0.0..=1.0).contains(&volatility)
}

/// Parse a share link or bare query string. Unknown keys and malformed
/// values are ignored rather than reported; a share link should never stop
/// the app from starting.
pub fn parse_query(input: &str) -> InitialConfig {
    let query = match input.split_once('?') {
        Some((_, query)) => query,
        None => input,
    };
    let mut config = InitialConfig::default();
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key {
            "mood" => {
                if let Ok(mood) = value.parse::<Mood>() {
                    config.mood = mood;
                }
            }
            "freq" => {
                if let Ok(frequency) = value.parse::<f32>() {
                    if valid_frequency(frequency) {
                        config.frequency = frequency;
                    }
                }
            }
            "vol" => {
                if let Ok(volatility) = value.parse::<f32>() {
                    if valid_volatility(volatility) {
                        config.volatility = volatility;
                    }
                }
            }
            _ => (),
        }
    }
    config
}

/// A URL that reconstructs the given state when fed back through
/// [`parse_query`].
pub fn share_url(
    base: &str,
    mood: Mood,
    frequency: f32,
    volatility: f32,
) -> String {
    format!(
        "{}?mood={}&freq={}&vol={}",
        base, mood, frequency, volatility
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_when_query_is_empty_or_garbage() {
        assert_eq!(parse_query(""), InitialConfig::default());
        assert_eq!(parse_query("nonsense"), InitialConfig::default());
        assert_eq!(parse_query("mood&freq&vol"), InitialConfig::default());
    }

    #[test]
    fn valid_parameters_are_accepted() {
        let config = parse_query("mood=despair&freq=2.8&vol=0.9");
        assert_eq!(config.mood, Mood::Despair);
        assert_eq!(config.frequency, 2.8);
        assert_eq!(config.volatility, 0.9);
    }

    #[test]
    fn out_of_range_frequency_is_rejected_but_mood_kept() {
        let config = parse_query("mood=euphoric&freq=15");
        assert_eq!(config.mood, Mood::Euphoric);
        assert_eq!(config.frequency, 1.0);
    }

    #[test]
    fn boundary_values() {
        // freq bounds are exclusive, vol bounds inclusive
        assert_eq!(parse_query("freq=0").frequency, 1.0);
        assert_eq!(parse_query("freq=10").frequency, 1.0);
        assert_eq!(parse_query("vol=0").volatility, 0.0);
        assert_eq!(parse_query("vol=1").volatility, 1.0);
        assert_eq!(parse_query("vol=1.1").volatility, 0.0);
    }

    #[test]
    fn unknown_mood_is_ignored() {
        let config = parse_query("mood=grumpy&vol=0.5");
        assert_eq!(config.mood, Mood::Optimistic);
        assert_eq!(config.volatility, 0.5);
    }

    #[test]
    fn full_url_round_trip() {
        let url =
            share_url("https://example.com/wave", Mood::Pessimistic, 2.5, 0.4);
        let config = parse_query(&url);
        assert_eq!(config.mood, Mood::Pessimistic);
        assert_eq!(config.frequency, 2.5);
        assert_eq!(config.volatility, 0.4);
    }
}
