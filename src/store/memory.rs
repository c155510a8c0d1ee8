use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, Utc};
use futures::FutureExt;
use futures::future::ready;

use super::{
    AccountStore, AttendanceStore, LeaveStore, NotificationSink, PayrollStore, StoreError,
    StoreFuture, UserDirectory,
};
use crate::config::HrNotifyPolicy;
use crate::model::{
    attendance::{Attendance, AttendanceTally, NewAttendance},
    leave_request::{LeaveChanges, LeaveRequest, LeaveStatus, NewLeave},
    notification::{NewNotification, Notification, NotificationMatch},
    payroll::{NewPayroll, Payroll, PayrollStatus},
    role::Role,
    user::{Account, NewAccount, UserProfile},
};

/// Process-local backend with the same semantics as the MySQL one.
/// Cloning shares the underlying tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    accounts: BTreeMap<u64, Account>,
    leaves: BTreeMap<u64, LeaveRequest>,
    notifications: BTreeMap<u64, Notification>,
    attendance: BTreeMap<u64, Attendance>,
    payrolls: BTreeMap<u64, Payroll>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Ids handed out by [`MemoryStore::seed_user`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededUser {
    pub user_id: u64,
    pub employee_id: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a user without a usable password. `names` creates an employee profile.
    pub fn seed_user(&self, email: &str, role: Role, names: Option<(&str, &str)>) -> SeededUser {
        let mut state = self.state();
        let user_id = state.next_id();
        let employee_id = names.map(|_| state.next_id());
        state.accounts.insert(
            user_id,
            Account {
                id: user_id,
                email: email.to_string(),
                password_hash: String::new(),
                role,
                employee_id,
                first_name: names.map(|(first, _)| first.to_string()),
                last_name: names.map(|(_, last)| last.to_string()),
            },
        );
        SeededUser {
            user_id,
            employee_id,
        }
    }
}

fn done<'a, T: Send + 'a>(value: T) -> StoreFuture<'a, T> {
    ready(Ok(value)).boxed()
}

fn newest_first(leaves: &mut [LeaveRequest]) {
    leaves.sort_by_key(|l| Reverse((l.created_at, l.id)));
}

impl LeaveStore for MemoryStore {
    fn insert(&self, new: NewLeave) -> StoreFuture<'_, LeaveRequest> {
        let mut state = self.state();
        let now = Utc::now();
        let leave = LeaveRequest {
            id: state.next_id(),
            owner_id: new.owner_id,
            start_date: new.start_date,
            end_date: new.end_date,
            leave_type: new.leave_type,
            reason: new.reason,
            status: LeaveStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.leaves.insert(leave.id, leave.clone());
        done(leave)
    }

    fn find(&self, id: u64) -> StoreFuture<'_, Option<LeaveRequest>> {
        let found = self.state().leaves.get(&id).cloned();
        done(found)
    }

    fn list_by_owner(&self, owner_id: u64) -> StoreFuture<'_, Vec<LeaveRequest>> {
        let mut leaves: Vec<_> = self
            .state()
            .leaves
            .values()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect();
        newest_first(&mut leaves);
        done(leaves)
    }

    fn list_by_status(&self, status: LeaveStatus) -> StoreFuture<'_, Vec<LeaveRequest>> {
        let mut leaves: Vec<_> = self
            .state()
            .leaves
            .values()
            .filter(|l| l.status == status)
            .cloned()
            .collect();
        newest_first(&mut leaves);
        done(leaves)
    }

    fn update_if_pending(
        &self,
        id: u64,
        changes: LeaveChanges,
    ) -> StoreFuture<'_, Option<LeaveRequest>> {
        let mut state = self.state();
        let updated = state
            .leaves
            .get_mut(&id)
            .filter(|l| l.status.is_pending())
            .map(|l| {
                l.start_date = changes.start_date;
                l.end_date = changes.end_date;
                l.leave_type = changes.leave_type;
                l.reason = changes.reason;
                l.updated_at = Utc::now();
                l.clone()
            });
        done(updated)
    }

    fn decide_if_pending(
        &self,
        id: u64,
        status: LeaveStatus,
    ) -> StoreFuture<'_, Option<LeaveRequest>> {
        let mut state = self.state();
        let updated = state
            .leaves
            .get_mut(&id)
            .filter(|l| l.status.is_pending())
            .map(|l| {
                l.status = status;
                l.updated_at = Utc::now();
                l.clone()
            });
        done(updated)
    }

    fn delete_if_pending(&self, id: u64) -> StoreFuture<'_, bool> {
        let mut state = self.state();
        let pending = state
            .leaves
            .get(&id)
            .is_some_and(|l| l.status.is_pending());
        if pending {
            state.leaves.remove(&id);
        }
        done(pending)
    }
}

impl NotificationSink for MemoryStore {
    fn append(&self, new: NewNotification) -> StoreFuture<'_, Notification> {
        let mut state = self.state();
        let notification = Notification {
            id: state.next_id(),
            recipient_id: new.recipient_id,
            message: new.message,
            read: false,
            link: new.link,
            created_at: Utc::now(),
        };
        state
            .notifications
            .insert(notification.id, notification.clone());
        done(notification)
    }

    fn find(&self, id: u64) -> StoreFuture<'_, Option<Notification>> {
        let found = self.state().notifications.get(&id).cloned();
        done(found)
    }

    fn list_for(&self, recipient_id: u64) -> StoreFuture<'_, Vec<Notification>> {
        let mut found: Vec<_> = self
            .state()
            .notifications
            .values()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        found.sort_by_key(|n| Reverse((n.created_at, n.id)));
        done(found)
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<Notification>> {
        let mut found: Vec<_> = self.state().notifications.values().cloned().collect();
        found.sort_by_key(|n| Reverse((n.created_at, n.id)));
        done(found)
    }

    fn mark_read(&self, id: u64) -> StoreFuture<'_, Option<Notification>> {
        let updated = self.state().notifications.get_mut(&id).map(|n| {
            n.read = true;
            n.clone()
        });
        done(updated)
    }

    fn delete_matching(&self, filter: NotificationMatch) -> StoreFuture<'_, u64> {
        let mut state = self.state();
        let before = state.notifications.len();
        state.notifications.retain(|_, n| !filter.matches(n));
        done((before - state.notifications.len()) as u64)
    }
}

impl UserDirectory for MemoryStore {
    fn find_user(&self, user_id: u64) -> StoreFuture<'_, Option<UserProfile>> {
        let found = self.state().accounts.get(&user_id).map(Account::profile);
        done(found)
    }

    fn find_employee(&self, employee_id: u64) -> StoreFuture<'_, Option<UserProfile>> {
        let found = self
            .state()
            .accounts
            .values()
            .find(|a| a.employee_id == Some(employee_id))
            .map(Account::profile);
        done(found)
    }

    fn hr_recipients(&self, policy: HrNotifyPolicy) -> StoreFuture<'_, Vec<u64>> {
        let state = self.state();
        // BTreeMap iteration is already ordered by id
        let hr = state
            .accounts
            .values()
            .filter(|a| a.role == Role::Hr)
            .map(|a| a.id);
        let ids = match policy {
            HrNotifyPolicy::First => hr.take(1).collect(),
            HrNotifyPolicy::All => hr.collect(),
        };
        done(ids)
    }
}

impl AccountStore for MemoryStore {
    fn find_by_email(&self, email: String) -> StoreFuture<'_, Option<Account>> {
        let found = self
            .state()
            .accounts
            .values()
            .find(|a| a.email == email)
            .cloned();
        done(found)
    }

    fn create_account(&self, new: NewAccount) -> StoreFuture<'_, Account> {
        let mut state = self.state();
        if state.accounts.values().any(|a| a.email == new.email) {
            return ready(Err(StoreError::Duplicate("Email".into()))).boxed();
        }
        let id = state.next_id();
        let employee_id = state.next_id();
        let account = Account {
            id,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            employee_id: Some(employee_id),
            first_name: Some(new.first_name),
            last_name: Some(new.last_name),
        };
        state.accounts.insert(id, account.clone());
        done(account)
    }
}

impl AttendanceStore for MemoryStore {
    fn insert(&self, new: NewAttendance) -> StoreFuture<'_, Attendance> {
        let mut state = self.state();
        let taken = state
            .attendance
            .values()
            .any(|a| a.employee_id == new.employee_id && a.date == new.date);
        if taken {
            return ready(Err(StoreError::Duplicate(
                "Attendance for this date".into(),
            )))
            .boxed();
        }
        let record = Attendance {
            id: state.next_id(),
            employee_id: new.employee_id,
            date: new.date,
            status: new.status,
            arrival: new.arrival,
            departure: new.departure,
            created_at: Utc::now(),
        };
        state.attendance.insert(record.id, record.clone());
        done(record)
    }

    fn list_for_employee(&self, employee_id: u64) -> StoreFuture<'_, Vec<Attendance>> {
        let mut found: Vec<_> = self
            .state()
            .attendance
            .values()
            .filter(|a| a.employee_id == employee_id)
            .cloned()
            .collect();
        found.sort_by_key(|a| Reverse((a.date, a.id)));
        done(found)
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<Attendance>> {
        let mut found: Vec<_> = self.state().attendance.values().cloned().collect();
        found.sort_by_key(|a| Reverse((a.date, a.id)));
        done(found)
    }

    fn tally(
        &self,
        employee_id: u64,
        from: NaiveDate,
        until: NaiveDate,
    ) -> StoreFuture<'_, AttendanceTally> {
        let mut tally = AttendanceTally::default();
        for record in self.state().attendance.values() {
            if record.employee_id == employee_id && record.date >= from && record.date < until {
                tally.record(record.status, 1);
            }
        }
        done(tally)
    }
}

impl PayrollStore for MemoryStore {
    fn insert(&self, new: NewPayroll) -> StoreFuture<'_, Payroll> {
        let mut state = self.state();
        let payroll = Payroll {
            id: state.next_id(),
            employee_id: new.employee_id,
            month: new.month,
            base_salary: new.base_salary,
            bonus: new.bonus,
            deductions: new.deductions,
            net_salary: new.net_salary(),
            status: PayrollStatus::Pending,
            paid_on: None,
            created_at: Utc::now(),
        };
        state.payrolls.insert(payroll.id, payroll.clone());
        done(payroll)
    }

    fn find(&self, id: u64) -> StoreFuture<'_, Option<Payroll>> {
        done(self.state().payrolls.get(&id).cloned())
    }

    fn mark_paid_if_pending(
        &self,
        id: u64,
        paid_on: NaiveDate,
    ) -> StoreFuture<'_, Option<Payroll>> {
        let mut state = self.state();
        let updated = state
            .payrolls
            .get_mut(&id)
            .filter(|p| p.status == PayrollStatus::Pending)
            .map(|p| {
                p.status = PayrollStatus::Paid;
                p.paid_on = Some(paid_on);
                p.clone()
            });
        done(updated)
    }

    fn list_for_employee(&self, employee_id: u64) -> StoreFuture<'_, Vec<Payroll>> {
        let mut found: Vec<_> = self
            .state()
            .payrolls
            .values()
            .filter(|p| p.employee_id == employee_id)
            .cloned()
            .collect();
        found.sort_by_key(|p| Reverse((p.month, p.id)));
        done(found)
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<Payroll>> {
        let mut found: Vec<_> = self.state().payrolls.values().cloned().collect();
        found.sort_by_key(|p| Reverse((p.month, p.id)));
        done(found)
    }
}
