//! Gift intake: product URL in, gift on a list out.
//!
//! Both entry points share one destination policy ([`select_destination`]):
//!
//! 1. An explicit list is used as-is unless a new list is forced.
//! 2. A forced new list is named after the suggested list name.
//! 3. Otherwise the caller's list whose name equals the suggestion is used,
//!    and a new list is created when there is none.
//!
//! Steps are not wrapped in a transaction. A list created for an intake
//! stays even if the gift insert that follows fails.

use futures::StreamExt;
use tracing::instrument;

use gift0_core::{Fingerprint, GiftUrl, ListId, ListName, UserId};

use super::{GiftService, IdentityService, ListService, ServiceError};
use crate::db::Store;
use crate::extraction::GiftExtractor;
use crate::models::{Gift, GiftList};

/// Extractions in flight at once during a batch.
const BATCH_CONCURRENCY: usize = 3;

/// Caller choices for where intake puts gifts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntakeOptions {
    /// List to add to.
    pub list_id: Option<ListId>,
    /// Always create a new list, even if `list_id` is set.
    pub force_new_list: bool,
}

impl IntakeOptions {
    /// The list to use without consulting the extraction, if any.
    #[must_use]
    pub fn explicit_list(&self) -> Option<ListId> {
        self.list_id.filter(|_| !self.force_new_list)
    }
}

/// Where an intake puts its gifts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Existing(ListId),
    Create(ListName),
}

/// Pick the destination list.
///
/// `owned` is the caller's lists. Matching on the suggested name is exact
/// and case-sensitive.
#[must_use]
pub fn select_destination(
    options: IntakeOptions,
    suggested: &ListName,
    owned: &[GiftList],
) -> Destination {
    if let Some(id) = options.explicit_list() {
        return Destination::Existing(id);
    }
    if options.force_new_list {
        return Destination::Create(suggested.clone());
    }
    owned
        .iter()
        .find(|list| &list.name == suggested)
        .map_or_else(
            || Destination::Create(suggested.clone()),
            |list| Destination::Existing(list.id),
        )
}

/// Result of a single-URL intake.
#[derive(Debug, Clone)]
pub struct IntakeOutcome {
    pub list_id: ListId,
    pub gift: Gift,
    /// Whether the list was created by this intake.
    pub is_new_list: bool,
}

/// Result for one URL of a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub url: String,
    pub result: Result<Gift, ServiceError>,
}

impl BatchItem {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Result of a batch intake, in input order.
#[derive(Debug)]
pub struct BatchOutcome {
    pub list_id: ListId,
    /// Name of the destination list, empty if the caller cannot see it.
    pub list_name: String,
    pub results: Vec<BatchItem>,
    /// Whether the list was created by this intake.
    pub is_new_list: bool,
}

/// Runs extraction, list selection, and gift insertion.
pub struct IntakeService<'a> {
    store: &'a dyn Store,
    extractor: &'a dyn GiftExtractor,
}

impl<'a> IntakeService<'a> {
    /// Create a new intake service.
    #[must_use]
    pub const fn new(store: &'a dyn Store, extractor: &'a dyn GiftExtractor) -> Self {
        Self { store, extractor }
    }

    /// Add the product at `url` to one of the caller's lists.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for a malformed URL (before any
    /// side effect), `ServiceError::Extraction` if extraction fails, and
    /// `ServiceError::Unauthorized` if an explicit list is not the caller's.
    #[instrument(skip(self))]
    pub async fn intake(
        &self,
        fingerprint: &Fingerprint,
        url: &str,
        options: IntakeOptions,
    ) -> Result<IntakeOutcome, ServiceError> {
        let url = GiftUrl::parse(url)?;
        let user = IdentityService::new(self.store).resolve(fingerprint).await?.user;

        let extracted = self.extractor.extract(&url).await?;
        let (list_id, is_new_list) = self
            .resolve_destination(user.id, options, &extracted.list_name)
            .await?;

        let gift = GiftService::new(self.store)
            .add(list_id, user.id, &extracted.to_new_gift())
            .await?;

        Ok(IntakeOutcome {
            list_id,
            gift,
            is_new_list,
        })
    }

    /// Add the products at `urls` to one list, chosen once up front.
    ///
    /// When the destination depends on the extraction, the first URL's
    /// extraction names it and is reused for that URL's gift.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::EmptyBatch` for no URLs and
    /// `ServiceError::Validation` if any URL is malformed, both before any
    /// side effect. Returns `ServiceError::Extraction` if the first URL
    /// cannot be extracted while naming the list. Later per-URL failures are
    /// reported in [`BatchOutcome::results`] instead.
    #[instrument(skip(self, urls), fields(count = urls.len()))]
    pub async fn intake_batch(
        &self,
        fingerprint: &Fingerprint,
        urls: &[String],
        options: IntakeOptions,
    ) -> Result<BatchOutcome, ServiceError> {
        let parsed = urls
            .iter()
            .map(|u| GiftUrl::parse(u))
            .collect::<Result<Vec<_>, _>>()?;
        let Some(first_url) = parsed.first() else {
            return Err(ServiceError::EmptyBatch);
        };

        let user = IdentityService::new(self.store).resolve(fingerprint).await?.user;

        let (list_id, is_new_list, mut first) = match options.explicit_list() {
            Some(id) => (id, false, None),
            None => {
                let first = self.extractor.extract(first_url).await?;
                let (id, is_new) = self
                    .resolve_destination(user.id, options, &first.list_name)
                    .await?;
                (id, is_new, Some(first))
            }
        };

        let extractor = self.extractor;
        let mut extractions = futures::stream::iter(parsed.iter().cloned().enumerate())
            .map(|(index, url)| {
                let cached = if index == 0 { first.take() } else { None };
                async move {
                    match cached {
                        Some(gift) => Ok(gift),
                        None => extractor.extract(&url).await,
                    }
                }
            })
            .buffered(BATCH_CONCURRENCY);

        let gifts = GiftService::new(self.store);
        let mut results = Vec::with_capacity(urls.len());
        for url in urls {
            let Some(extracted) = extractions.next().await else {
                break;
            };
            let result = match extracted {
                Ok(gift) => gifts.add(list_id, user.id, &gift.to_new_gift()).await,
                Err(e) => Err(e.into()),
            };
            if let Err(e) = &result {
                tracing::warn!(%url, error = %e, "batch item failed");
            }
            results.push(BatchItem {
                url: url.clone(),
                result,
            });
        }

        let list_name = match self.store.find_list(list_id).await? {
            Some(list) if list.is_owned_by(user.id) => list.name.as_str().to_owned(),
            _ => String::new(),
        };

        Ok(BatchOutcome {
            list_id,
            list_name,
            results,
            is_new_list,
        })
    }

    /// Apply the destination policy, creating a list if needed.
    async fn resolve_destination(
        &self,
        user_id: UserId,
        options: IntakeOptions,
        suggested: &ListName,
    ) -> Result<(ListId, bool), ServiceError> {
        let owned = if options.explicit_list().is_none() && !options.force_new_list {
            self.store.lists_by_owner(user_id).await?
        } else {
            Vec::new()
        };

        match select_destination(options, suggested, &owned) {
            Destination::Existing(id) => Ok((id, false)),
            Destination::Create(name) => {
                let list = ListService::new(self.store).create(user_id, &name).await?;
                Ok((list.id, true))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use chrono::Utc;

    use gift0_core::{GiftName, Priority, ShareToken};

    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::db::{GiftStore, ListStore};
    use crate::extraction::{ExtractedGift, ExtractionError};

    /// Extractor answering from a fixed table; unknown URLs fail.
    struct Scripted {
        answers: HashMap<String, (String, String)>,
    }

    impl Scripted {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            Self {
                answers: entries
                    .iter()
                    .map(|(url, name, list)| {
                        ((*url).to_owned(), ((*name).to_owned(), (*list).to_owned()))
                    })
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl GiftExtractor for Scripted {
        async fn extract(&self, url: &GiftUrl) -> Result<ExtractedGift, ExtractionError> {
            let (name, list) = self
                .answers
                .get(url.as_str())
                .ok_or(ExtractionError::EmptyContent)?;
            Ok(ExtractedGift {
                name: GiftName::parse(name).unwrap(),
                url: url.clone(),
                price: None,
                priority: Priority::Medium,
                list_name: ListName::parse(list).unwrap(),
            })
        }
    }

    fn fp() -> Fingerprint {
        Fingerprint::parse("fp-intake").unwrap()
    }

    fn list(name: &str) -> GiftList {
        GiftList {
            id: ListId::generate(),
            name: ListName::parse(name).unwrap(),
            owner_id: UserId::generate(),
            share_token: ShareToken::generate(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_select_destination_policy() {
        let suggested = ListName::parse("Tech Gifts").unwrap();
        let tech = list("Tech Gifts");
        let books = list("Books");
        let owned = vec![books.clone(), tech.clone()];

        let explicit = IntakeOptions {
            list_id: Some(books.id),
            force_new_list: false,
        };
        assert_eq!(
            select_destination(explicit, &suggested, &owned),
            Destination::Existing(books.id)
        );

        let forced = IntakeOptions {
            list_id: Some(books.id),
            force_new_list: true,
        };
        assert_eq!(
            select_destination(forced, &suggested, &owned),
            Destination::Create(suggested.clone())
        );

        assert_eq!(
            select_destination(IntakeOptions::default(), &suggested, &owned),
            Destination::Existing(tech.id)
        );
        assert_eq!(
            select_destination(IntakeOptions::default(), &suggested, &[books]),
            Destination::Create(suggested.clone())
        );
        assert_eq!(
            select_destination(IntakeOptions::default(), &suggested, &[]),
            Destination::Create(suggested.clone())
        );

        let other_case = list("tech gifts");
        assert_eq!(
            select_destination(IntakeOptions::default(), &suggested, &[other_case]),
            Destination::Create(suggested)
        );
    }

    #[tokio::test]
    async fn test_first_intake_creates_named_list() {
        let store = MemoryStore::new();
        let extractor = Scripted::new(&[("https://a.example/1", "Headphones", "Tech Gifts")]);
        let intake = IntakeService::new(&store, &extractor);

        let outcome = intake
            .intake(&fp(), "https://a.example/1", IntakeOptions::default())
            .await
            .unwrap();

        assert!(outcome.is_new_list);
        assert_eq!(store.list_count().await, 1);
        assert_eq!(store.gift_count().await, 1);
        let list = store.find_list(outcome.list_id).await.unwrap().unwrap();
        assert_eq!(list.name.as_str(), "Tech Gifts");
        assert_eq!(outcome.gift.name.as_str(), "Headphones");
        assert!(!outcome.gift.purchased);
    }

    #[tokio::test]
    async fn test_matching_name_reuses_list() {
        let store = MemoryStore::new();
        let extractor = Scripted::new(&[
            ("https://a.example/1", "Headphones", "Tech Gifts"),
            ("https://a.example/2", "Keyboard", "Tech Gifts"),
            ("https://a.example/3", "Novel", "Books"),
        ]);
        let intake = IntakeService::new(&store, &extractor);

        let first = intake
            .intake(&fp(), "https://a.example/1", IntakeOptions::default())
            .await
            .unwrap();
        let second = intake
            .intake(&fp(), "https://a.example/2", IntakeOptions::default())
            .await
            .unwrap();
        assert_eq!(first.list_id, second.list_id);
        assert!(!second.is_new_list);

        let third = intake
            .intake(&fp(), "https://a.example/3", IntakeOptions::default())
            .await
            .unwrap();
        assert_ne!(third.list_id, first.list_id);
        assert!(third.is_new_list);
        assert_eq!(store.list_count().await, 2);
    }

    #[tokio::test]
    async fn test_malformed_url_has_no_side_effects() {
        let store = MemoryStore::new();
        let extractor = Scripted::new(&[]);
        let intake = IntakeService::new(&store, &extractor);

        let err = intake
            .intake(&fp(), "not a url", IntakeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_extraction_failure_aborts_single_intake() {
        let store = MemoryStore::new();
        let extractor = Scripted::new(&[]);
        let intake = IntakeService::new(&store, &extractor);

        let err = intake
            .intake(&fp(), "https://a.example/missing", IntakeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Extraction(_)));
        assert_eq!(store.list_count().await, 0);
    }

    #[tokio::test]
    async fn test_explicit_foreign_list_is_unauthorized() {
        let store = MemoryStore::new();
        let extractor = Scripted::new(&[("https://a.example/1", "Headphones", "Tech Gifts")]);
        let intake = IntakeService::new(&store, &extractor);
        let owner = IdentityService::new(&store)
            .resolve(&Fingerprint::parse("fp-owner").unwrap())
            .await
            .unwrap()
            .user;
        let foreign = ListService::new(&store)
            .create(owner.id, &ListName::parse("Not yours").unwrap())
            .await
            .unwrap();

        let options = IntakeOptions {
            list_id: Some(foreign.id),
            force_new_list: false,
        };
        let err = intake
            .intake(&fp(), "https://a.example/1", options)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized));
        assert_eq!(store.gift_count().await, 0);
    }

    #[tokio::test]
    async fn test_batch_isolates_failures_in_order() {
        let store = MemoryStore::new();
        let extractor = Scripted::new(&[
            ("https://a.example/a", "Gift A", "Mixed Bag"),
            ("https://a.example/c", "Gift C", "Ignored"),
        ]);
        let intake = IntakeService::new(&store, &extractor);
        let urls = vec![
            "https://a.example/a".to_owned(),
            "https://a.example/b".to_owned(),
            "https://a.example/c".to_owned(),
        ];

        let outcome = intake
            .intake_batch(&fp(), &urls, IntakeOptions::default())
            .await
            .unwrap();

        assert!(outcome.is_new_list);
        assert_eq!(outcome.list_name, "Mixed Bag");
        let got: Vec<_> = outcome
            .results
            .iter()
            .map(|r| (r.url.as_str(), r.is_success()))
            .collect();
        assert_eq!(
            got,
            [
                ("https://a.example/a", true),
                ("https://a.example/b", false),
                ("https://a.example/c", true),
            ]
        );

        let gifts = store.gifts_by_lists(&[outcome.list_id]).await.unwrap();
        let mut names: Vec<_> = gifts.iter().map(|g| g.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, ["Gift A", "Gift C"]);
    }

    #[tokio::test]
    async fn test_empty_batch_fails_without_side_effects() {
        let store = MemoryStore::new();
        let extractor = Scripted::new(&[]);
        let intake = IntakeService::new(&store, &extractor);

        let err = intake
            .intake_batch(&fp(), &[], IntakeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::EmptyBatch));
        assert_eq!(store.user_count().await, 0);
        assert_eq!(store.list_count().await, 0);
    }

    #[tokio::test]
    async fn test_batch_with_malformed_url_is_rejected() {
        let store = MemoryStore::new();
        let extractor = Scripted::new(&[("https://a.example/a", "Gift A", "Mixed Bag")]);
        let intake = IntakeService::new(&store, &extractor);
        let urls = vec!["https://a.example/a".to_owned(), "nope".to_owned()];

        let err = intake
            .intake_batch(&fp(), &urls, IntakeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(store.gift_count().await, 0);
    }

    #[tokio::test]
    async fn test_batch_first_extraction_failure_writes_nothing() {
        let store = MemoryStore::new();
        let extractor = Scripted::new(&[("https://a.example/b", "Gift B", "Mixed Bag")]);
        let intake = IntakeService::new(&store, &extractor);
        let urls = vec![
            "https://a.example/a".to_owned(),
            "https://a.example/b".to_owned(),
        ];

        let err = intake
            .intake_batch(&fp(), &urls, IntakeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Extraction(_)));
        assert_eq!(store.list_count().await, 0);
        assert_eq!(store.gift_count().await, 0);
    }

    #[tokio::test]
    async fn test_batch_into_explicit_list_skips_naming() {
        let store = MemoryStore::new();
        let extractor = Scripted::new(&[("https://a.example/b", "Gift B", "Whatever")]);
        let intake = IntakeService::new(&store, &extractor);
        let user = IdentityService::new(&store).resolve(&fp()).await.unwrap().user;
        let target = ListService::new(&store)
            .create(user.id, &ListName::parse("Chosen").unwrap())
            .await
            .unwrap();
        let urls = vec![
            "https://a.example/a".to_owned(),
            "https://a.example/b".to_owned(),
        ];
        let options = IntakeOptions {
            list_id: Some(target.id),
            force_new_list: false,
        };

        let outcome = intake.intake_batch(&fp(), &urls, options).await.unwrap();

        assert!(!outcome.is_new_list);
        assert_eq!(outcome.list_id, target.id);
        assert_eq!(outcome.list_name, "Chosen");
        assert!(!outcome.results[0].is_success());
        assert!(outcome.results[1].is_success());
        assert_eq!(store.list_count().await, 1);
    }

    #[tokio::test]
    async fn test_batch_into_foreign_list_reports_blank_name() {
        let store = MemoryStore::new();
        let extractor = Scripted::new(&[("https://a.example/a", "Gift A", "Whatever")]);
        let intake = IntakeService::new(&store, &extractor);
        let owner = IdentityService::new(&store)
            .resolve(&Fingerprint::parse("fp-owner").unwrap())
            .await
            .unwrap()
            .user;
        let foreign = ListService::new(&store)
            .create(owner.id, &ListName::parse("Private").unwrap())
            .await
            .unwrap();
        let options = IntakeOptions {
            list_id: Some(foreign.id),
            force_new_list: false,
        };

        let outcome = intake
            .intake_batch(&fp(), &["https://a.example/a".to_owned()], options)
            .await
            .unwrap();

        assert_eq!(outcome.list_name, "");
        assert!(matches!(
            outcome.results[0].result,
            Err(ServiceError::Unauthorized)
        ));
    }
}
