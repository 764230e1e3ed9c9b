//! In-memory estimation service used by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use crate::api::EstimationApi;
use crate::models::{Attachment, FormRecord, PhotoFeedback, PriceResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Cities,
    Districts(String),
    Estimate(Value),
    Upload { files: Vec<String>, parameters: Value },
}

pub struct FakeApi {
    pub cities: Vec<String>,
    pub districts: HashMap<String, Vec<String>>,
    pub price: PriceResult,
    pub feedback: PhotoFeedback,
    pub fail_lookups: bool,
    pub fail_estimate: bool,
    pub fail_upload: bool,
    districts_down: AtomicBool,
    calls: Mutex<Vec<Call>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    estimate_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            cities: vec!["Kraków".into(), "Warszawa".into(), "Gdańsk".into()],
            districts: HashMap::from([
                (
                    "Kraków".to_string(),
                    vec!["Stare Miasto".into(), "Krowodrza".into(), "Podgórze".into()],
                ),
                (
                    "Warszawa".to_string(),
                    vec!["Śródmieście".into(), "Mokotów".into(), "Wola".into()],
                ),
            ]),
            price: PriceResult(654_000),
            feedback: PhotoFeedback {
                score: 7,
                reason: "Jasne i czyste wnętrze".into(),
                pros: vec!["duże okna".into()],
                to_fix: vec!["stara kuchnia".into()],
                description: "Słoneczne mieszkanie na Woli".into(),
            },
            fail_lookups: false,
            fail_estimate: false,
            fail_upload: false,
            districts_down: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
            estimate_gate: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Make district lookups for `city` wait until the returned handle is notified
    pub fn hold_districts(&self, city: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(city.to_string(), Arc::clone(&gate));
        gate
    }

    /// Make only district lookups fail, switchable while the fake is shared
    pub fn set_districts_down(&self, down: bool) {
        self.districts_down.store(down, Ordering::SeqCst);
    }

    /// Make estimates wait until the returned handle is notified
    pub fn hold_estimate(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.estimate_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl EstimationApi for FakeApi {
    async fn cities(&self) -> Result<Vec<String>> {
        self.record(Call::Cities);
        if self.fail_lookups {
            anyhow::bail!("city lookup failed: 503 Service Unavailable");
        }
        Ok(self.cities.clone())
    }

    async fn districts(&self, city: &str) -> Result<Vec<String>> {
        self.record(Call::Districts(city.to_string()));

        let gate = self.gates.lock().unwrap().get(city).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_lookups || self.districts_down.load(Ordering::SeqCst) {
            anyhow::bail!("district lookup failed: 503 Service Unavailable");
        }
        Ok(self.districts.get(city).cloned().unwrap_or_default())
    }

    async fn estimate(&self, record: &FormRecord) -> Result<PriceResult> {
        self.record(Call::Estimate(serde_json::to_value(record)?));

        let gate = self.estimate_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_estimate {
            anyhow::bail!("estimate failed: 500 Internal Server Error");
        }
        Ok(self.price)
    }

    async fn upload_photos(
        &self,
        files: &[Attachment],
        record: &FormRecord,
    ) -> Result<PhotoFeedback> {
        self.record(Call::Upload {
            files: files.iter().map(|f| f.file_name.clone()).collect(),
            parameters: serde_json::to_value(record)?,
        });
        if self.fail_upload {
            anyhow::bail!("photo upload failed: 502 Bad Gateway");
        }
        Ok(self.feedback.clone())
    }
}
