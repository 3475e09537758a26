//! Depot code resolution and the embedded location tables.

use crate::error::{PricingError, Result};

/// Office-use code to human-readable depot name.
pub const LOCATION_CODES: [(&str, &str); 85] = [
    ("ABI", "Abingdon"),
    ("ABN", "Aberdeen"),
    ("BIC", "Bicester"),
    ("BIL", "Billingshurst"),
    ("BIR", "Birmingham"),
    ("BNB", "Banbury"),
    ("BOU", "Bournemouth"),
    ("BRE", "Brentwood"),
    ("BRI", "Bristol"),
    ("CAN", "Canterbury"),
    ("CHI", "Chichester"),
    ("CHM", "Chelmsford"),
    ("CLY", "Crawley"),
    ("COA", "Coatbridge"),
    ("DAL", "Dalkeith"),
    ("DDE", "Dundee"),
    ("DER", "Derby"),
    ("DUN", "Dunbar"),
    ("DUR", "Durham"),
    ("EAS", "Eastbourne"),
    ("EDI", "Edinburgh"),
    ("ELI", "Elgin"),
    ("EST", "Eastleigh"),
    ("EXE", "Exeter"),
    ("EYN", "Eynsham"),
    ("FAL", "Falkirk"),
    ("FRO", "Frome"),
    ("GHD", "Gateshead"),
    ("GLA", "Glasgow"),
    ("HAD", "Haddington"),
    ("HAI", "Hainault"),
    ("HAR", "Harrogate"),
    ("HAS", "Hastings"),
    ("HOR", "Horsham"),
    ("HOT", "Henley-on-Thames"),
    ("HRE", "Houghton-Regis"),
    ("HUN", "Huntly"),
    ("HWY", "High Wycombe"),
    ("INR", "Inverurie"),
    ("IOW", "Isle-of-Wight"),
    ("IPS", "Ipswich"),
    ("KID", "Kidlington"),
    ("KNA", "Knaresborough"),
    ("KNT", "Maidstone"),
    ("LAN", "Lancaster"),
    ("LEM", "Leamington-Spa"),
    ("LEW", "Lewes"),
    ("LON", "Harrow"),
    ("MUS", "Musselburgh"),
    ("NAN", "Nantwich"),
    ("NBE", "North Berwick"),
    ("NCL", "Newcastle"),
    ("NEW", "Newbury"),
    ("NTH", "North Shields"),
    ("OHL", "Oxenholme"),
    ("ONF", "On-fleet Bay"),
    ("ORK", "Orkney"),
    ("OXF", "Oxford"),
    ("PEN", "Penrith"),
    ("PER", "Perth"),
    ("PLY", "Plymouth"),
    ("PUT", "Putney"),
    ("REA", "Reading"),
    ("RIP", "Ripon"),
    ("SAF", "Saffron Walden"),
    ("SAL", "Salford"),
    ("SBY", "Salisbury"),
    ("SHR", "Shrewsbury"),
    ("SOL", "Solihull"),
    ("SSH", "South Shields"),
    ("SUN", "Sunderland"),
    ("SWI", "Swindon"),
    ("TUN", "Tunbridge Wells"),
    ("UPP", "Upper Tooting"),
    ("WAL", "Walton-on-Thames"),
    ("WAN", "Wandsworth"),
    ("WAR", "Warwick"),
    ("WIN", "Winchester"),
    ("WLG", "Wallingford"),
    ("WND", "Windermere"),
    ("WNT", "Wantage"),
    ("WOK", "Wokingham"),
    ("WOR", "Worthing"),
    ("WRR", "Warrington"),
    ("WSM", "Weston-super-Mare"),
];

/// Depots removed from the selectable UI list.
pub const EXCLUDED_LOCATIONS: [&str; 23] = [
    "Banbury",
    "Billingshurst",
    "Coatbridge",
    "Dalkeith",
    "Dunbar",
    "Exeter",
    "Haddington",
    "Huntly",
    "Leamington-Spa",
    "Nantwich",
    "Newbury",
    "North Berwick",
    "North Shields",
    "On-fleet Bay",
    "Poole",
    "Putney",
    "South Shields",
    "Sunderland",
    "Upper Tooting",
    "Wandsworth",
    "Warwick",
    "Wokingham",
    "Worthing",
];

/// Substring fallbacks used when `location_office_use` is missing and the
/// free-text description identifies the depot (typos included).
const DESCRIPTION_FALLBACKS: [(&[&str], &str); 11] = [
    (&["lower maudlin", "bristol"], "BRI"),
    (&["glasgow", "glsgow"], "GLA"),
    (&["nwcastle"], "NCL"),
    (&["birmingham"], "BIR"),
    (&["tunbridge wells"], "TUN"),
    (&["frome"], "FRO"),
    (&["exeter"], "EXE"),
    (&["durham"], "DUR"),
    (&["salford", "slaford"], "SAL"),
    (&["s'land"], "SWI"),
    (&["reading"], "REA"),
];

/// Human name for an office-use code, if known.
pub fn location_name(code: &str) -> Option<&'static str> {
    LOCATION_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Resolve a depot code from the office-use column or, failing that, from a
/// case-insensitive substring match on the description.
pub fn infer_location_code(
    office_use: Option<&str>,
    description: Option<&str>,
) -> Option<String> {
    if let Some(code) = office_use {
        let code = code.trim();
        if !code.is_empty() {
            return Some(code.chars().take(3).collect());
        }
    }
    let description = description?.to_lowercase();
    for (needles, code) in DESCRIPTION_FALLBACKS {
        if needles.iter().any(|n| description.contains(n)) {
            return Some((*code).to_string());
        }
    }
    None
}

/// The sorted depot list with the excluded depots removed.
///
/// Every entry of the removal list is expected to be present; a missing one
/// means the dataset does not match the UI contract.
pub fn selectable_locations(all: &[String]) -> Result<Vec<String>> {
    let mut names = all.to_vec();
    names.sort();
    names.dedup();
    for excluded in EXCLUDED_LOCATIONS {
        let idx = names
            .iter()
            .position(|n| n == excluded)
            .ok_or_else(|| PricingError::Data(format!("location list missing {excluded}")))?;
        names.remove(idx);
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_lookup() {
        assert_eq!(location_name("GLA"), Some("Glasgow"));
        assert_eq!(location_name("NCL"), Some("Newcastle"));
        assert_eq!(location_name("TUN"), Some("Tunbridge Wells"));
        assert_eq!(location_name("ZZZ"), None);
    }

    #[test]
    fn test_office_use_truncated_to_three_chars() {
        assert_eq!(
            infer_location_code(Some("BRI - Lower Maudlin St"), None),
            Some("BRI".to_string())
        );
    }

    #[test]
    fn test_description_fallbacks() {
        assert_eq!(
            infer_location_code(None, Some("Glsgow city centre")),
            Some("GLA".to_string())
        );
        assert_eq!(
            infer_location_code(None, Some("S'land depot")),
            Some("SWI".to_string())
        );
        assert_eq!(infer_location_code(None, Some("nowhere special")), None);
        assert_eq!(infer_location_code(None, None), None);
    }

    #[test]
    fn test_selectable_locations_removes_excluded() {
        let all: Vec<String> = LOCATION_CODES
            .iter()
            .map(|(_, name)| name.to_string())
            .chain(std::iter::once("Poole".to_string()))
            .collect();
        let names = selectable_locations(&all).unwrap();
        assert!(!names.contains(&"Banbury".to_string()));
        assert!(names.contains(&"Bristol".to_string()));
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_selectable_locations_requires_every_excluded_entry() {
        let all = vec!["Bristol".to_string()];
        assert!(selectable_locations(&all).is_err());
    }
}
