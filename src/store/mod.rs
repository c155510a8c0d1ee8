//! Persistence seams.
//!
//! Each concern is a trait returning boxed futures so the rest of the crate can
//! hold `Arc<dyn ...>` handles and swap the MySQL backend for the in-memory one.

pub mod memory;
pub mod mysql;

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::BoxFuture;
use sqlx::MySqlPool;
use thiserror::Error;

use crate::config::HrNotifyPolicy;
use crate::model::{
    attendance::{Attendance, AttendanceTally, NewAttendance},
    leave_request::{LeaveChanges, LeaveRequest, LeaveStatus, NewLeave},
    notification::{NewNotification, Notification, NotificationMatch},
    payroll::{NewPayroll, Payroll},
    user::{Account, NewAccount, UserProfile},
};
use crate::utils::profile_cache::CachedDirectory;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique key rejected the write; carries the entity name.
    #[error("duplicate {0}")]
    Duplicate(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreFuture<'a, T> = BoxFuture<'a, Result<T, StoreError>>;

pub trait LeaveStore: Send + Sync {
    /// Inserts with status `Pending`.
    fn insert(&self, new: NewLeave) -> StoreFuture<'_, LeaveRequest>;
    fn find(&self, id: u64) -> StoreFuture<'_, Option<LeaveRequest>>;
    /// Newest first.
    fn list_by_owner(&self, owner_id: u64) -> StoreFuture<'_, Vec<LeaveRequest>>;
    /// Newest first.
    fn list_by_status(&self, status: LeaveStatus) -> StoreFuture<'_, Vec<LeaveRequest>>;
    /// Applies `changes` only while the request is still `Pending`.
    /// `None` means nothing was written.
    fn update_if_pending(
        &self,
        id: u64,
        changes: LeaveChanges,
    ) -> StoreFuture<'_, Option<LeaveRequest>>;
    /// Moves a `Pending` request to `status`. `None` means nothing was written.
    fn decide_if_pending(
        &self,
        id: u64,
        status: LeaveStatus,
    ) -> StoreFuture<'_, Option<LeaveRequest>>;
    /// Deletes a `Pending` request; returns whether a row went away.
    fn delete_if_pending(&self, id: u64) -> StoreFuture<'_, bool>;
}

pub trait NotificationSink: Send + Sync {
    fn append(&self, new: NewNotification) -> StoreFuture<'_, Notification>;
    fn find(&self, id: u64) -> StoreFuture<'_, Option<Notification>>;
    /// Newest first.
    fn list_for(&self, recipient_id: u64) -> StoreFuture<'_, Vec<Notification>>;
    fn list_all(&self) -> StoreFuture<'_, Vec<Notification>>;
    fn mark_read(&self, id: u64) -> StoreFuture<'_, Option<Notification>>;
    /// Returns the number of deleted notifications.
    fn delete_matching(&self, filter: NotificationMatch) -> StoreFuture<'_, u64>;
}

pub trait UserDirectory: Send + Sync {
    fn find_user(&self, user_id: u64) -> StoreFuture<'_, Option<UserProfile>>;
    /// Profile of the user owning employee record `employee_id`.
    fn find_employee(&self, employee_id: u64) -> StoreFuture<'_, Option<UserProfile>>;
    /// User ids of the HR accounts selected by `policy`, lowest id first.
    fn hr_recipients(&self, policy: HrNotifyPolicy) -> StoreFuture<'_, Vec<u64>>;
}

pub trait AccountStore: Send + Sync {
    fn find_by_email(&self, email: String) -> StoreFuture<'_, Option<Account>>;
    /// Creates the user and its employee profile together.
    fn create_account(&self, new: NewAccount) -> StoreFuture<'_, Account>;
}

pub trait AttendanceStore: Send + Sync {
    fn insert(&self, new: NewAttendance) -> StoreFuture<'_, Attendance>;
    /// Newest date first.
    fn list_for_employee(&self, employee_id: u64) -> StoreFuture<'_, Vec<Attendance>>;
    fn list_all(&self) -> StoreFuture<'_, Vec<Attendance>>;
    /// Counts days in `[from, until)`.
    fn tally(
        &self,
        employee_id: u64,
        from: NaiveDate,
        until: NaiveDate,
    ) -> StoreFuture<'_, AttendanceTally>;
}

pub trait PayrollStore: Send + Sync {
    /// Inserts with status `Pending`.
    fn insert(&self, new: NewPayroll) -> StoreFuture<'_, Payroll>;
    fn find(&self, id: u64) -> StoreFuture<'_, Option<Payroll>>;
    /// Moves a `Pending` payroll to `Paid` on `paid_on`. `None` means nothing was written.
    fn mark_paid_if_pending(
        &self,
        id: u64,
        paid_on: NaiveDate,
    ) -> StoreFuture<'_, Option<Payroll>>;
    /// Newest month first.
    fn list_for_employee(&self, employee_id: u64) -> StoreFuture<'_, Vec<Payroll>>;
    fn list_all(&self) -> StoreFuture<'_, Vec<Payroll>>;
}

/// Shared handles to every store, registered once as app data.
#[derive(Clone)]
pub struct Stores {
    pub leaves: Arc<dyn LeaveStore>,
    pub notifications: Arc<dyn NotificationSink>,
    pub directory: Arc<dyn UserDirectory>,
    pub accounts: Arc<dyn AccountStore>,
    pub attendance: Arc<dyn AttendanceStore>,
    pub payroll: Arc<dyn PayrollStore>,
}

impl Stores {
    pub fn mysql(pool: MySqlPool) -> Self {
        let store = Arc::new(MySqlStore::new(pool));
        Self {
            leaves: store.clone(),
            notifications: store.clone(),
            directory: Arc::new(CachedDirectory::new(store.clone())),
            accounts: store.clone(),
            attendance: store.clone(),
            payroll: store,
        }
    }

    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            leaves: store.clone(),
            notifications: store.clone(),
            directory: store.clone(),
            accounts: store.clone(),
            attendance: store.clone(),
            payroll: store,
        }
    }
}
