//! Fixtures and `CharacterApi` doubles shared by the unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rickdex_model::{
    CharacterId, CharacterQuery, CharacterRecord, CharacterStatus,
    NamedResource, PageResult,
};
use tokio::sync::oneshot;

use crate::api::CharacterApi;
use crate::error::FetchError;

pub(crate) fn record(
    id: u32,
    name: &str,
    status: CharacterStatus,
) -> CharacterRecord {
    CharacterRecord {
        id: CharacterId(id),
        name: name.to_string(),
        status,
        species: "Human".to_string(),
        kind: String::new(),
        gender: "Male".to_string(),
        origin: NamedResource {
            name: "Earth (C-137)".to_string(),
            url: "https://rickandmortyapi.com/api/location/1".to_string(),
        },
        location: NamedResource {
            name: "Citadel of Ricks".to_string(),
            url: "https://rickandmortyapi.com/api/location/3".to_string(),
        },
        image: format!(
            "https://rickandmortyapi.com/api/character/avatar/{id}.jpeg"
        ),
        episode: vec!["https://rickandmortyapi.com/api/episode/1".into()],
        url: format!("https://rickandmortyapi.com/api/character/{id}"),
        created: Utc.with_ymd_and_hms(2017, 11, 4, 18, 48, 46).unwrap(),
    }
}

pub(crate) fn page_of(
    total_count: u32,
    page_count: u32,
    records: Vec<CharacterRecord>,
) -> PageResult {
    PageResult {
        total_count,
        page_count,
        records,
    }
}

/// One-record page whose record name echoes the query, so tests can tell
/// which request produced an outcome.
pub(crate) fn page_for(query: &CharacterQuery) -> PageResult {
    page_of(
        1,
        1,
        vec![record(
            query.page.to_wire(),
            &query.name,
            CharacterStatus::Alive,
        )],
    )
}

type Responder =
    dyn Fn(&CharacterQuery) -> Result<PageResult, FetchError> + Send + Sync;

/// Answers immediately and records every query it receives.
pub(crate) struct RecordingApi {
    calls: Mutex<Vec<CharacterQuery>>,
    respond: Box<Responder>,
}

impl RecordingApi {
    pub(crate) fn new() -> Arc<Self> {
        Self::with(|query| Ok(page_for(query)))
    }

    pub(crate) fn with<F>(respond: F) -> Arc<Self>
    where
        F: Fn(&CharacterQuery) -> Result<PageResult, FetchError>
            + Send
            + Sync
            + 'static,
    {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    pub(crate) fn calls(&self) -> Vec<CharacterQuery> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CharacterApi for RecordingApi {
    async fn fetch_characters(
        &self,
        query: &CharacterQuery,
    ) -> Result<PageResult, FetchError> {
        self.calls.lock().unwrap().push(query.clone());
        (self.respond)(query)
    }
}

struct GatedCall {
    query: CharacterQuery,
    responder: Option<oneshot::Sender<Result<PageResult, FetchError>>>,
}

/// Holds every request open until the test resolves it, in any order.
pub(crate) struct GatedApi {
    calls: Mutex<Vec<GatedCall>>,
}

impl GatedApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn queries(&self) -> Vec<CharacterQuery> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|call| call.query.clone())
            .collect()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Complete request `index`. Returns `false` if the caller already gave
    /// up on it (the request was abandoned).
    pub(crate) fn resolve(
        &self,
        index: usize,
        result: Result<PageResult, FetchError>,
    ) -> bool {
        let responder = self.calls.lock().unwrap()[index].responder.take();
        match responder {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }

    /// Resolve request `index` with the page [`page_for`] builds.
    pub(crate) fn resolve_echo(&self, index: usize) -> bool {
        let query = self.calls.lock().unwrap()[index].query.clone();
        self.resolve(index, Ok(page_for(&query)))
    }
}

#[async_trait]
impl CharacterApi for GatedApi {
    async fn fetch_characters(
        &self,
        query: &CharacterQuery,
    ) -> Result<PageResult, FetchError> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push(GatedCall {
            query: query.clone(),
            responder: Some(tx),
        });
        rx.await.unwrap_or_else(|_| {
            Err(FetchError::Transport("gate dropped".to_string()))
        })
    }
}
