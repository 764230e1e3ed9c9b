//! City and district options for the location fields.
//!
//! Lookups never fail from the caller's point of view: an unreachable service
//! yields an empty list and the form falls back to free-text inputs.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::api::EstimationApi;
use crate::models::FormRecord;

/// Result of a district lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistrictUpdate {
    /// The list was stored as the current district options
    Applied(Vec<String>),
    /// A newer city was selected while this lookup was in flight
    Superseded,
}

#[derive(Debug, Default)]
struct Options {
    cities: Vec<String>,
    districts: Vec<String>,
    /// City the current district list belongs to
    districts_of: Option<String>,
    /// Ticket of the newest district request
    generation: u64,
}

pub struct LocationResolver {
    api: Arc<dyn EstimationApi>,
    options: Mutex<Options>,
}

impl LocationResolver {
    pub fn new(api: Arc<dyn EstimationApi>) -> Self {
        Self {
            api,
            options: Mutex::new(Options::default()),
        }
    }

    fn options(&self) -> MutexGuard<'_, Options> {
        // Options are replaced in single assignments, a poisoned guard is still consistent
        self.options.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch the city list and keep it as the current options
    pub async fn load_cities(&self) -> Vec<String> {
        let cities = match self.api.cities().await {
            Ok(cities) => cities,
            Err(error) => {
                warn!(?error, "City lookup failed, falling back to manual entry");
                Vec::new()
            }
        };

        debug!("Loaded {} cities", cities.len());
        self.options().cities = cities.clone();
        cities
    }

    /// Fetch the districts of `city`.
    ///
    /// Only the newest request may store its result: a response for a city
    /// that has since been replaced by another selection is discarded. A
    /// failed lookup is not remembered, the next sync asks again.
    pub async fn select_city(&self, city: &str) -> DistrictUpdate {
        let ticket = {
            let mut options = self.options();
            options.generation += 1;
            options.generation
        };

        let fetched = if city.trim().is_empty() {
            Some(Vec::new())
        } else {
            self.fetch_districts(city).await
        };

        let mut options = self.options();
        if options.generation != ticket {
            debug!(city, ticket, newest = options.generation, "Discarding stale district list");
            return DistrictUpdate::Superseded;
        }

        match fetched {
            Some(districts) => {
                options.districts = districts.clone();
                options.districts_of = Some(city.to_string());
                DistrictUpdate::Applied(districts)
            }
            None => {
                options.districts.clear();
                options.districts_of = None;
                DistrictUpdate::Applied(Vec::new())
            }
        }
    }

    /// Districts of `city` without touching the form's options
    pub async fn lookup_districts(&self, city: &str) -> Vec<String> {
        if city.trim().is_empty() {
            return Vec::new();
        }
        self.fetch_districts(city).await.unwrap_or_default()
    }

    async fn fetch_districts(&self, city: &str) -> Option<Vec<String>> {
        match self.api.districts(city).await {
            Ok(districts) => Some(districts),
            Err(error) => {
                warn!(city, ?error, "District lookup failed, falling back to manual entry");
                None
            }
        }
    }

    pub fn cities(&self) -> Vec<String> {
        self.options().cities.clone()
    }

    /// District options, but only if they belong to `city`
    pub fn districts_for(&self, city: &str) -> Option<Vec<String>> {
        let options = self.options();
        (options.districts_of.as_deref() == Some(city)).then(|| options.districts.clone())
    }
}

/// Make the record's city and district agree with the fetched options.
///
/// A value missing from a non-empty option list is replaced by the first
/// option. Empty lists leave the value alone so manual entry keeps working.
/// Returns true if anything changed.
pub fn reconcile(record: &mut FormRecord, cities: &[String], districts: &[String]) -> bool {
    let mut changed = false;

    if let Some(first) = cities.first() {
        if !cities.contains(&record.city) {
            debug!(from = %record.city, to = %first, "Seeding city");
            record.city = first.clone();
            changed = true;
        }
    }

    if let Some(first) = districts.first() {
        if !districts.contains(&record.district) {
            debug!(from = %record.district, to = %first, "Seeding district");
            record.district = first.clone();
            changed = true;
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Call, FakeApi};
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn cities_are_fetched_and_cached() {
        let resolver = LocationResolver::new(Arc::new(FakeApi::new()));

        let cities = resolver.load_cities().await;

        assert_eq!(cities, strings(&["Kraków", "Warszawa", "Gdańsk"]));
        assert_eq!(resolver.cities(), cities);
    }

    #[tokio::test]
    async fn lookup_failures_degrade_to_empty_lists() {
        let mut api = FakeApi::new();
        api.fail_lookups = true;
        let resolver = LocationResolver::new(Arc::new(api));

        assert!(resolver.load_cities().await.is_empty());
        assert_eq!(
            resolver.select_city("Kraków").await,
            DistrictUpdate::Applied(Vec::new())
        );
    }

    #[tokio::test]
    async fn failed_district_lookup_is_retried_once_the_service_recovers() {
        let api = Arc::new(FakeApi::new());
        api.set_districts_down(true);
        let resolver = LocationResolver::new(api.clone());

        assert_eq!(resolver.select_city("Kraków").await, DistrictUpdate::Applied(Vec::new()));
        assert_eq!(resolver.districts_for("Kraków"), None);

        api.set_districts_down(false);

        assert_eq!(
            resolver.select_city("Kraków").await,
            DistrictUpdate::Applied(strings(&["Stare Miasto", "Krowodrza", "Podgórze"]))
        );
        assert_eq!(
            resolver.districts_for("Kraków"),
            Some(strings(&["Stare Miasto", "Krowodrza", "Podgórze"]))
        );
    }

    #[tokio::test]
    async fn side_lookup_leaves_the_selected_districts_alone() {
        let api = Arc::new(FakeApi::new());
        let resolver = LocationResolver::new(api.clone());
        resolver.select_city("Warszawa").await;

        let krakow = resolver.lookup_districts("Kraków").await;

        assert_eq!(krakow, strings(&["Stare Miasto", "Krowodrza", "Podgórze"]));
        assert_eq!(resolver.districts_for("Kraków"), None);
        assert_eq!(
            resolver.districts_for("Warszawa"),
            Some(strings(&["Śródmieście", "Mokotów", "Wola"]))
        );
    }

    #[tokio::test]
    async fn blank_city_does_not_hit_the_service() {
        let api = Arc::new(FakeApi::new());
        let resolver = LocationResolver::new(api.clone());

        assert_eq!(resolver.select_city("  ").await, DistrictUpdate::Applied(Vec::new()));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn latest_selected_city_wins_over_a_slow_earlier_lookup() {
        let api = Arc::new(FakeApi::new());
        let krakow_gate = api.hold_districts("Kraków");
        let resolver = Arc::new(LocationResolver::new(api.clone()));

        let slow = tokio::spawn({
            let resolver = Arc::clone(&resolver);
            async move { resolver.select_city("Kraków").await }
        });
        while api.calls().is_empty() {
            tokio::task::yield_now().await;
        }

        let second = resolver.select_city("Warszawa").await;
        krakow_gate.notify_one();
        let first = slow.await.unwrap();

        assert_eq!(first, DistrictUpdate::Superseded);
        assert_eq!(
            second,
            DistrictUpdate::Applied(strings(&["Śródmieście", "Mokotów", "Wola"]))
        );
        assert_eq!(resolver.districts_for("Kraków"), None);
        assert_eq!(
            resolver.districts_for("Warszawa"),
            Some(strings(&["Śródmieście", "Mokotów", "Wola"]))
        );
        assert_eq!(
            api.calls(),
            vec![
                Call::Districts("Kraków".into()),
                Call::Districts("Warszawa".into())
            ]
        );
    }

    #[test]
    fn missing_district_defaults_to_the_first_option() {
        let mut record = FormRecord {
            city: "Kraków".into(),
            ..Default::default()
        };

        let changed = reconcile(
            &mut record,
            &strings(&["Kraków", "Warszawa"]),
            &strings(&["Stare Miasto", "Krowodrza"]),
        );

        assert!(changed);
        assert_eq!(record.city, "Kraków");
        assert_eq!(record.district, "Stare Miasto");
    }

    #[test]
    fn carried_over_values_are_reset() {
        let mut record = FormRecord {
            city: "Łódź".into(),
            district: "Wola".into(),
            ..Default::default()
        };

        reconcile(
            &mut record,
            &strings(&["Kraków", "Warszawa"]),
            &strings(&["Podgórze"]),
        );

        assert_eq!(record.city, "Kraków");
        assert_eq!(record.district, "Podgórze");
    }

    #[test]
    fn empty_options_keep_manual_entries() {
        let mut record = FormRecord {
            city: "Opole".into(),
            district: "Zaodrze".into(),
            ..Default::default()
        };

        assert!(!reconcile(&mut record, &[], &[]));
        assert_eq!(record.city, "Opole");
        assert_eq!(record.district, "Zaodrze");
    }
}
