//! Placeholder substitution for file names and run labels.

use chrono::{DateTime, Utc};

use crate::tree::ConfigTree;

/// Text substituted for `{night}`; night boundaries are not computed.
pub const NIGHT_PLACEHOLDER: &str = "<UTCNight>";

/// Substitutes the standard placeholders in `template`.
///
/// | placeholder    | replacement                                        |
/// |----------------|----------------------------------------------------|
/// | `{time}`       | Unix time in whole seconds                         |
/// | `{utc}`        | UTC timestamp as `YYYYmmddHHMM`                    |
/// | `{night}`      | [`NIGHT_PLACEHOLDER`]                              |
/// | `{instrument}` | `instrument.name` of `cfg`, or `None` if missing   |
///
/// Unknown placeholders are left untouched.
///
/// # Examples
///
/// ```
/// use cfgtree::{tag_string, ConfigTree};
///
/// let cfg = ConfigTree::new();
/// cfg.register("instrument.name", "MEC").unwrap();
/// assert_eq!(tag_string("{instrument}_{night}.h5", Some(&cfg)), "MEC_<UTCNight>.h5");
/// assert_eq!(tag_string("{instrument}", None), "None");
/// ```
#[must_use]
pub fn tag_string(template: &str, cfg: Option<&ConfigTree>) -> String {
    tag_string_at(template, cfg, Utc::now())
}

fn tag_string_at(template: &str, cfg: Option<&ConfigTree>, now: DateTime<Utc>) -> String {
    let instrument = cfg
        .and_then(|cfg| cfg.lookup("instrument.name").ok())
        .map_or_else(|| "None".to_string(), |name| name.to_string());

    template
        .replace("{time}", &now.timestamp().to_string())
        .replace("{utc}", &now.format("%Y%m%d%H%M").to_string())
        .replace("{night}", NIGHT_PLACEHOLDER)
        .replace("{instrument}", &instrument)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 3, 7, 4, 5, 6).unwrap()
    }

    #[test]
    fn test_time_placeholders() {
        let tagged = tag_string_at("{utc}/{time}", None, fixed());
        assert_eq!(tagged, format!("201903070405/{}", fixed().timestamp()));
    }

    #[test]
    fn test_instrument_lookup_is_strict() {
        let cfg = ConfigTree::new();
        cfg.register("name", "inherited").unwrap();
        cfg.register("instrument.type", "mkid").unwrap();
        assert_eq!(tag_string_at("{instrument}", Some(&cfg), fixed()), "None");

        cfg.register("instrument.name", "DARKNESS").unwrap();
        assert_eq!(tag_string_at("{instrument}", Some(&cfg), fixed()), "DARKNESS");
    }

    #[test]
    fn test_unknown_placeholders_survive() {
        assert_eq!(
            tag_string_at("{night}-{other}", None, fixed()),
            "<UTCNight>-{other}"
        );
    }
}
