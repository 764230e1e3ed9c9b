use serde::{Deserialize, Serialize};

/// A closed set of values offered by a select input.
///
/// `code` is what goes over the wire and into the form markup, `label` is
/// what the user sees.
pub trait Choice: Copy + Eq + 'static {
    const ALL: &'static [Self];

    fn code(self) -> &'static str;

    fn label(self) -> &'static str;

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($code:literal, $label:literal), )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $code)] $variant, )+
        }

        impl Choice for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }
    };
}

choice_enum! {
    /// Heating source of the building
    #[derive(Default)]
    pub enum HeatingType {
        #[default]
        District => ("miejskie", "Miejskie"),
        Gas => ("gazowe", "Gazowe"),
        Electric => ("elektryczne", "Elektryczne"),
        Other => ("inne", "Inne"),
    }
}

choice_enum! {
    /// Finishing condition of the flat
    #[derive(Default)]
    pub enum StateType {
        NeedsRenovation => ("do_remontu", "Do remontu"),
        #[default]
        ReadyToMove => ("do_zamieszkania", "Do zamieszkania"),
        NeedsFinishing => ("do_wykonczenia", "Do wykończenia"),
    }
}

choice_enum! {
    #[derive(Default)]
    pub enum MarketType {
        Primary => ("pierwotny", "Pierwotny"),
        #[default]
        Secondary => ("wtorny", "Wtórny"),
    }
}

choice_enum! {
    #[derive(Default)]
    pub enum OwnershipType {
        #[default]
        Ownership => ("wlasnosc", "Własność"),
        Cooperative => ("spoldzielcze", "Spółdzielcze własnościowe"),
        Other => ("inne", "Inne"),
    }
}

choice_enum! {
    /// Who publishes the listing
    #[derive(Default)]
    pub enum AdType {
        #[default]
        Private => ("prywatny", "Prywatny"),
        Agency => ("biuro", "Biuro nieruchomości"),
    }
}

choice_enum! {
    /// When the flat can be moved into
    #[derive(Default)]
    pub enum Availability {
        #[default]
        Now => ("od zaraz", "Od zaraz"),
        Y2025 => ("2025", "2025"),
        Y2026 => ("2026", "2026"),
        Y2027 => ("2027", "2027"),
        Y2028OrLater => ("2028+", "2028 lub później"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_form_defaults() {
        assert_eq!(HeatingType::default(), HeatingType::District);
        assert_eq!(StateType::default(), StateType::ReadyToMove);
        assert_eq!(MarketType::default(), MarketType::Secondary);
        assert_eq!(OwnershipType::default(), OwnershipType::Ownership);
        assert_eq!(AdType::default(), AdType::Private);
        assert_eq!(Availability::default(), Availability::Now);
    }

    #[test]
    fn serde_uses_the_wire_codes() {
        let json = serde_json::to_string(&StateType::NeedsFinishing).unwrap();
        assert_eq!(json, "\"do_wykonczenia\"");

        let parsed: Availability = serde_json::from_str("\"2028+\"").unwrap();
        assert_eq!(parsed, Availability::Y2028OrLater);
    }

    #[test]
    fn from_code_rejects_labels_and_unknown_values() {
        assert_eq!(MarketType::from_code("pierwotny"), Some(MarketType::Primary));
        assert_eq!(MarketType::from_code("Pierwotny"), None);
        assert_eq!(OwnershipType::from_code(""), None);
    }
}
