use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use moka::future::Cache;

use crate::config::HrNotifyPolicy;
use crate::model::user::UserProfile;
use crate::store::{StoreFuture, UserDirectory};

const PROFILE_TTL: Duration = Duration::from_secs(600);
const PROFILE_CAPACITY: u64 = 50_000;

/// Read-through cache in front of a [`UserDirectory`]. Only profile lookups
/// are cached; HR routing always reads the store.
pub struct CachedDirectory {
    inner: Arc<dyn UserDirectory>,
    profiles: Cache<u64, UserProfile>,
}

impl CachedDirectory {
    pub fn new(inner: Arc<dyn UserDirectory>) -> Self {
        Self {
            inner,
            profiles: Cache::builder()
                .max_capacity(PROFILE_CAPACITY)
                .time_to_live(PROFILE_TTL)
                .build(),
        }
    }
}

impl UserDirectory for CachedDirectory {
    fn find_user(&self, user_id: u64) -> StoreFuture<'_, Option<UserProfile>> {
        async move {
            if let Some(hit) = self.profiles.get(&user_id).await {
                return Ok(Some(hit));
            }

            let found = self.inner.find_user(user_id).await?;
            if let Some(profile) = &found {
                self.profiles.insert(user_id, profile.clone()).await;
            }
            Ok(found)
        }
        .boxed()
    }

    fn find_employee(&self, employee_id: u64) -> StoreFuture<'_, Option<UserProfile>> {
        self.inner.find_employee(employee_id)
    }

    fn hr_recipients(&self, policy: HrNotifyPolicy) -> StoreFuture<'_, Vec<u64>> {
        self.inner.hr_recipients(policy)
    }
}
