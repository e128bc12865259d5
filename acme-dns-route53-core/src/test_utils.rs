//! Test helper module
//!
//! In-memory [`ZoneRecordApi`] with scripted change status responses.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use acme_dns_route53_provider::{
    ChangeInfo, ChangeRequest, ChangeStatus, HostedZone, ProviderError, RecordSet, RecordType,
    Result, ZoneRecordApi,
};

/// Outcome of one scripted `get_change` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    Pending,
    InSync,
    Fail,
}

pub fn zone(id: &str, name: &str) -> HostedZone {
    HostedZone {
        id: id.to_string(),
        name: name.to_string(),
        record_count: None,
        private_zone: false,
        comment: None,
    }
}

pub fn private_zone(id: &str, name: &str) -> HostedZone {
    HostedZone {
        private_zone: true,
        ..zone(id, name)
    }
}

pub fn txt_record(name: &str, values: &[&str]) -> RecordSet {
    RecordSet {
        name: name.to_string(),
        record_type: RecordType::Txt,
        ttl: Some(60),
        values: values.iter().map(ToString::to_string).collect(),
    }
}

fn network_error(detail: &str) -> ProviderError {
    ProviderError::NetworkError {
        provider: "mock".to_string(),
        detail: detail.to_string(),
    }
}

// ===== MockZoneApi =====

pub struct MockZoneApi {
    zones: Mutex<Vec<HostedZone>>,
    records: Mutex<Vec<RecordSet>>,
    /// Consumed front to back; once empty every poll reports INSYNC
    polls: Mutex<VecDeque<PollStep>>,
    zone_filters: Mutex<Vec<Option<String>>>,
    submitted: Mutex<Vec<ChangeRequest>>,
    poll_count: Mutex<u32>,
    fail_list_zones: Mutex<bool>,
    fail_submit: Mutex<bool>,
}

impl MockZoneApi {
    pub fn new() -> Arc<Self> {
        Self::with_zones(Vec::new())
    }

    pub fn with_zones(zones: Vec<HostedZone>) -> Arc<Self> {
        Arc::new(Self {
            zones: Mutex::new(zones),
            records: Mutex::new(Vec::new()),
            polls: Mutex::new(VecDeque::new()),
            zone_filters: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            poll_count: Mutex::new(0),
            fail_list_zones: Mutex::new(false),
            fail_submit: Mutex::new(false),
        })
    }

    pub async fn set_records(&self, records: Vec<RecordSet>) {
        *self.records.lock().await = records;
    }

    pub async fn script_polls(&self, steps: Vec<PollStep>) {
        *self.polls.lock().await = steps.into();
    }

    pub async fn fail_list_zones(&self, fail: bool) {
        *self.fail_list_zones.lock().await = fail;
    }

    pub async fn fail_submit(&self, fail: bool) {
        *self.fail_submit.lock().await = fail;
    }

    /// Filters passed to `list_zones`, in call order.
    pub async fn zone_filters(&self) -> Vec<Option<String>> {
        self.zone_filters.lock().await.clone()
    }

    pub async fn submitted(&self) -> Vec<ChangeRequest> {
        self.submitted.lock().await.clone()
    }

    pub async fn poll_count(&self) -> u32 {
        *self.poll_count.lock().await
    }
}

#[async_trait]
impl ZoneRecordApi for MockZoneApi {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn list_zones(&self, filter: Option<&str>) -> Result<Vec<HostedZone>> {
        self.zone_filters
            .lock()
            .await
            .push(filter.map(ToString::to_string));
        if *self.fail_list_zones.lock().await {
            return Err(network_error("list_zones failed"));
        }
        Ok(self.zones.lock().await.clone())
    }

    async fn list_records(&self, _zone_id: &str) -> Result<Vec<RecordSet>> {
        Ok(self.records.lock().await.clone())
    }

    async fn submit_change(&self, change: &ChangeRequest) -> Result<ChangeInfo> {
        if *self.fail_submit.lock().await {
            return Err(ProviderError::InvalidChangeBatch {
                provider: "mock".to_string(),
                messages: vec!["rejected".to_string()],
            });
        }
        let mut submitted = self.submitted.lock().await;
        submitted.push(change.clone());
        Ok(ChangeInfo {
            id: format!("C{}", submitted.len()),
            status: ChangeStatus::Pending,
            submitted_at: None,
            comment: change.comment.clone(),
        })
    }

    async fn get_change(&self, change_id: &str) -> Result<ChangeInfo> {
        *self.poll_count.lock().await += 1;
        let step = self
            .polls
            .lock()
            .await
            .pop_front()
            .unwrap_or(PollStep::InSync);
        let status = match step {
            PollStep::Pending => ChangeStatus::Pending,
            PollStep::InSync => ChangeStatus::InSync,
            PollStep::Fail => return Err(network_error("get_change failed")),
        };
        Ok(ChangeInfo {
            id: change_id.to_string(),
            status,
            submitted_at: None,
            comment: None,
        })
    }
}
