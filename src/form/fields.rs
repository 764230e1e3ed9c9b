//! Field components: every input of the form, how it is labelled, and how
//! raw input text becomes a typed value on the record.

use thiserror::Error;

use crate::models::{
    AdType, Availability, Choice, FormRecord, HeatingType, MarketType, OwnershipType, StateType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Location,
    City,
    District,
    Area,
    Rooms,
    Floor,
    FloorsInBuilding,
    Rent,
    Heating,
    State,
    Market,
    Ownership,
    AdType,
    Available,
    Balcony,
    SeparateKitchen,
    Garage,
    Elevator,
    Basement,
    Photos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Numeric,
    Toggle,
    Select,
    Files,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("To pole jest wymagane")]
    Required,
    #[error("Podaj liczbę")]
    NotANumber,
    #[error("Podaj liczbę całkowitą")]
    NotAnInteger,
    #[error("Wartość nie może być ujemna")]
    Negative,
    #[error("Wartość musi być większa od zera")]
    NotPositive,
    #[error("Mieszkanie musi mieć co najmniej jeden pokój")]
    NoRooms,
    #[error("Piętro nie może być wyższe niż liczba pięter w budynku")]
    FloorAboveBuilding,
    #[error("Nieznana wartość: {0}")]
    UnknownOption(String),
    #[error("{0}")]
    Attachment(String),
}

impl Field {
    pub const ALL: [Field; 20] = [
        Field::Location,
        Field::City,
        Field::District,
        Field::Area,
        Field::Rooms,
        Field::Floor,
        Field::FloorsInBuilding,
        Field::Rent,
        Field::Heating,
        Field::State,
        Field::Market,
        Field::Ownership,
        Field::AdType,
        Field::Available,
        Field::Balcony,
        Field::SeparateKitchen,
        Field::Garage,
        Field::Elevator,
        Field::Basement,
        Field::Photos,
    ];

    /// Name of the input in the form markup, same as the JSON key
    pub fn name(self) -> &'static str {
        match self {
            Field::Location => "location",
            Field::City => "city",
            Field::District => "district",
            Field::Area => "area",
            Field::Rooms => "rooms",
            Field::Floor => "floor",
            Field::FloorsInBuilding => "floorsInBuilding",
            Field::Rent => "rent",
            Field::Heating => "heating",
            Field::State => "state",
            Field::Market => "market",
            Field::Ownership => "ownership",
            Field::AdType => "ad_type",
            Field::Available => "available",
            Field::Balcony => "balcony",
            Field::SeparateKitchen => "separate_kitchen",
            Field::Garage => "garage",
            Field::Elevator => "elevator",
            Field::Basement => "basement",
            Field::Photos => "files",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Location => "Pełny adres",
            Field::City => "Miasto",
            Field::District => "Dzielnica",
            Field::Area => "Powierzchnia",
            Field::Rooms => "Liczba pokoi",
            Field::Floor => "Piętro",
            Field::FloorsInBuilding => "Liczba pięter w budynku",
            Field::Rent => "Czynsz",
            Field::Heating => "Ogrzewanie",
            Field::State => "Stan wykończenia",
            Field::Market => "Rynek",
            Field::Ownership => "Forma własności",
            Field::AdType => "Typ ogłoszeniodawcy",
            Field::Available => "Dostępne od",
            Field::Balcony => "Balkon",
            Field::SeparateKitchen => "Oddzielna kuchnia",
            Field::Garage => "Garaż",
            Field::Elevator => "Winda",
            Field::Basement => "Piwnica",
            Field::Photos => "Zdjęcia (opcjonalnie)",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Location | Field::City | Field::District => FieldKind::Text,
            Field::Area | Field::Rooms | Field::Floor | Field::FloorsInBuilding | Field::Rent => {
                FieldKind::Numeric
            }
            Field::Heating
            | Field::State
            | Field::Market
            | Field::Ownership
            | Field::AdType
            | Field::Available => FieldKind::Select,
            Field::Balcony
            | Field::SeparateKitchen
            | Field::Garage
            | Field::Elevator
            | Field::Basement => FieldKind::Toggle,
            Field::Photos => FieldKind::Files,
        }
    }

    pub fn unit(self) -> Option<&'static str> {
        match self {
            Field::Area => Some("m²"),
            Field::Rent => Some("zł"),
            _ => None,
        }
    }

    /// `(code, label)` pairs of a select field, empty for other kinds
    pub fn options(self) -> Vec<(&'static str, &'static str)> {
        fn pairs<C: Choice>() -> Vec<(&'static str, &'static str)> {
            C::ALL.iter().map(|c| (c.code(), c.label())).collect()
        }

        match self {
            Field::Heating => pairs::<HeatingType>(),
            Field::State => pairs::<StateType>(),
            Field::Market => pairs::<MarketType>(),
            Field::Ownership => pairs::<OwnershipType>(),
            Field::AdType => pairs::<AdType>(),
            Field::Available => pairs::<Availability>(),
            _ => Vec::new(),
        }
    }

    /// Whether the record holds a value for this field
    pub fn is_filled(self, record: &FormRecord) -> bool {
        match self {
            Field::Location => !record.location.trim().is_empty(),
            Field::City => !record.city.trim().is_empty(),
            Field::District => !record.district.trim().is_empty(),
            Field::Area => record.area.is_some(),
            Field::Rooms => record.rooms.is_some(),
            Field::Floor => record.floor.is_some(),
            Field::FloorsInBuilding => record.floors_in_building.is_some(),
            Field::Rent => record.rent.is_some(),
            Field::Photos => false,
            // toggles and selects always carry a value
            _ => true,
        }
    }

    /// Current value as the input would display it
    pub fn display(self, record: &FormRecord) -> String {
        fn number<T: ToString>(value: Option<T>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        match self {
            Field::Location => record.location.clone(),
            Field::City => record.city.clone(),
            Field::District => record.district.clone(),
            Field::Area => number(record.area),
            Field::Rooms => number(record.rooms),
            Field::Floor => number(record.floor),
            Field::FloorsInBuilding => number(record.floors_in_building),
            Field::Rent => number(record.rent),
            Field::Heating => record.heating.code().to_string(),
            Field::State => record.state.code().to_string(),
            Field::Market => record.market.code().to_string(),
            Field::Ownership => record.ownership.code().to_string(),
            Field::AdType => record.ad_type.code().to_string(),
            Field::Available => record.available.code().to_string(),
            Field::Balcony
            | Field::SeparateKitchen
            | Field::Garage
            | Field::Elevator
            | Field::Basement => self.is_checked(record).to_string(),
            Field::Photos => String::new(),
        }
    }

    pub fn is_checked(self, record: &FormRecord) -> bool {
        match self {
            Field::Balcony => record.balcony,
            Field::SeparateKitchen => record.separate_kitchen,
            Field::Garage => record.garage,
            Field::Elevator => record.elevator,
            Field::Basement => record.basement,
            _ => false,
        }
    }

    /// Store raw input text on the record.
    ///
    /// On error the field is cleared: numeric values are either valid or
    /// null. Select fields keep their previous value.
    pub fn apply(self, record: &mut FormRecord, raw: &str) -> Result<(), FieldError> {
        match self {
            Field::Location => record.location = raw.trim().to_string(),
            Field::City => record.city = raw.trim().to_string(),
            Field::District => record.district = raw.trim().to_string(),
            Field::Area => set_number(&mut record.area, parse_decimal(raw))?,
            Field::Rent => set_number(&mut record.rent, parse_decimal(raw))?,
            Field::Rooms => set_number(&mut record.rooms, parse_integer(raw))?,
            Field::Floor => set_number(&mut record.floor, parse_integer(raw))?,
            Field::FloorsInBuilding => {
                set_number(&mut record.floors_in_building, parse_integer(raw))?
            }
            Field::Heating => record.heating = parse_choice(raw)?,
            Field::State => record.state = parse_choice(raw)?,
            Field::Market => record.market = parse_choice(raw)?,
            Field::Ownership => record.ownership = parse_choice(raw)?,
            Field::AdType => record.ad_type = parse_choice(raw)?,
            Field::Available => record.available = parse_choice(raw)?,
            Field::Balcony => record.balcony = parse_toggle(raw),
            Field::SeparateKitchen => record.separate_kitchen = parse_toggle(raw),
            Field::Garage => record.garage = parse_toggle(raw),
            Field::Elevator => record.elevator = parse_toggle(raw),
            Field::Basement => record.basement = parse_toggle(raw),
            Field::Photos => {}
        }
        Ok(())
    }
}

fn set_number<T>(
    slot: &mut Option<T>,
    parsed: Result<Option<T>, FieldError>,
) -> Result<(), FieldError> {
    match parsed {
        Ok(value) => {
            *slot = value;
            Ok(())
        }
        Err(error) => {
            *slot = None;
            Err(error)
        }
    }
}

/// Decimal with either `.` or `,` as the separator, empty means null
fn parse_decimal(raw: &str) -> Result<Option<f64>, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value: f64 = raw
        .replace(',', ".")
        .parse()
        .map_err(|_| FieldError::NotANumber)?;
    if !value.is_finite() {
        return Err(FieldError::NotANumber);
    }
    if value < 0.0 {
        return Err(FieldError::Negative);
    }
    Ok(Some(value))
}

fn parse_integer<T: TryFrom<i64>>(raw: &str) -> Result<Option<T>, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value: i64 = match raw.parse() {
        Ok(value) => value,
        Err(_) if raw.replace(',', ".").parse::<f64>().is_ok() => {
            return Err(FieldError::NotAnInteger)
        }
        Err(_) => return Err(FieldError::NotANumber),
    };
    if value < 0 {
        return Err(FieldError::Negative);
    }
    T::try_from(value).map(Some).map_err(|_| FieldError::NotANumber)
}

fn parse_choice<C: Choice>(raw: &str) -> Result<C, FieldError> {
    C::from_code(raw.trim()).ok_or_else(|| FieldError::UnknownOption(raw.trim().to_string()))
}

/// Browsers send `on` for a checked checkbox and nothing otherwise
fn parse_toggle(raw: &str) -> bool {
    !matches!(raw.trim(), "" | "false" | "off" | "0")
}
