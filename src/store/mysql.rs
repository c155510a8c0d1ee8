use chrono::NaiveDate;
use futures::FutureExt;
use sqlx::MySqlPool;

use super::{
    AccountStore, AttendanceStore, LeaveStore, NotificationSink, PayrollStore, StoreError,
    StoreFuture, UserDirectory,
};
use crate::config::HrNotifyPolicy;
use crate::model::{
    attendance::{Attendance, AttendanceStatus, AttendanceTally, NewAttendance},
    leave_request::{LeaveChanges, LeaveRequest, LeaveStatus, NewLeave},
    notification::{NewNotification, Notification, NotificationMatch},
    payroll::{NewPayroll, Payroll, PayrollStatus},
    role::Role,
    user::{Account, NewAccount, UserProfile},
};

const LEAVE_COLUMNS: &str =
    "id, owner_id, start_date, end_date, leave_type, reason, status, created_at, updated_at";
const NOTIFICATION_COLUMNS: &str = "id, recipient_id, message, is_read, link, created_at";
const ATTENDANCE_COLUMNS: &str = "id, employee_id, date, status, arrival, departure, created_at";
const PAYROLL_COLUMNS: &str =
    "id, employee_id, month, base_salary, bonus, deductions, net_salary, status, paid_on, created_at";

/// MySQL integrity-constraint violation (duplicate key, FK failure).
const SQLSTATE_INTEGRITY: &str = "23000";

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn leave_by_id(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?");
        Ok(sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn payroll_by_id(&self, id: u64) -> Result<Option<Payroll>, StoreError> {
        let sql = format!("SELECT {PAYROLL_COLUMNS} FROM payroll WHERE id = ?");
        Ok(sqlx::query_as::<_, Payroll>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn notification_by_id(&self, id: u64) -> Result<Option<Notification>, StoreError> {
        let sql = format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?");
        Ok(sqlx::query_as::<_, Notification>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

fn is_integrity_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(SQLSTATE_INTEGRITY))
}

fn inserted<T>(row: Option<T>, table: &str) -> Result<T, StoreError> {
    row.ok_or_else(|| StoreError::Unavailable(format!("{table} row vanished after insert")))
}

impl LeaveStore for MySqlStore {
    fn insert(&self, new: NewLeave) -> StoreFuture<'_, LeaveRequest> {
        async move {
            let result = sqlx::query(
                r#"
                INSERT INTO leave_requests
                    (owner_id, start_date, end_date, leave_type, reason, status)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(new.owner_id)
            .bind(new.start_date)
            .bind(new.end_date)
            .bind(&new.leave_type)
            .bind(&new.reason)
            .bind(LeaveStatus::Pending)
            .execute(&self.pool)
            .await?;

            inserted(self.leave_by_id(result.last_insert_id()).await?, "leave_requests")
        }
        .boxed()
    }

    fn find(&self, id: u64) -> StoreFuture<'_, Option<LeaveRequest>> {
        self.leave_by_id(id).boxed()
    }

    fn list_by_owner(&self, owner_id: u64) -> StoreFuture<'_, Vec<LeaveRequest>> {
        async move {
            let sql = format!(
                "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE owner_id = ? ORDER BY created_at DESC, id DESC"
            );
            Ok(sqlx::query_as::<_, LeaveRequest>(&sql)
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?)
        }
        .boxed()
    }

    fn list_by_status(&self, status: LeaveStatus) -> StoreFuture<'_, Vec<LeaveRequest>> {
        async move {
            let sql = format!(
                "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE status = ? ORDER BY created_at DESC, id DESC"
            );
            Ok(sqlx::query_as::<_, LeaveRequest>(&sql)
                .bind(status)
                .fetch_all(&self.pool)
                .await?)
        }
        .boxed()
    }

    fn update_if_pending(
        &self,
        id: u64,
        changes: LeaveChanges,
    ) -> StoreFuture<'_, Option<LeaveRequest>> {
        async move {
            // updated_at always changes, so rows_affected is 1 whenever the guard matched
            let result = sqlx::query(
                r#"
                UPDATE leave_requests
                SET start_date = ?, end_date = ?, leave_type = ?, reason = ?,
                    updated_at = CURRENT_TIMESTAMP(6)
                WHERE id = ?
                AND status = ?
                "#,
            )
            .bind(changes.start_date)
            .bind(changes.end_date)
            .bind(&changes.leave_type)
            .bind(&changes.reason)
            .bind(id)
            .bind(LeaveStatus::Pending)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Ok(None);
            }
            self.leave_by_id(id).await
        }
        .boxed()
    }

    fn decide_if_pending(
        &self,
        id: u64,
        status: LeaveStatus,
    ) -> StoreFuture<'_, Option<LeaveRequest>> {
        async move {
            let result = sqlx::query(
                r#"
                UPDATE leave_requests
                SET status = ?, updated_at = CURRENT_TIMESTAMP(6)
                WHERE id = ?
                AND status = ?
                "#,
            )
            .bind(status)
            .bind(id)
            .bind(LeaveStatus::Pending)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Ok(None);
            }
            self.leave_by_id(id).await
        }
        .boxed()
    }

    fn delete_if_pending(&self, id: u64) -> StoreFuture<'_, bool> {
        async move {
            let result = sqlx::query("DELETE FROM leave_requests WHERE id = ? AND status = ?")
                .bind(id)
                .bind(LeaveStatus::Pending)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        }
        .boxed()
    }
}

impl NotificationSink for MySqlStore {
    fn append(&self, new: NewNotification) -> StoreFuture<'_, Notification> {
        async move {
            let result = sqlx::query(
                "INSERT INTO notifications (recipient_id, message, is_read, link) VALUES (?, ?, FALSE, ?)",
            )
            .bind(new.recipient_id)
            .bind(&new.message)
            .bind(&new.link)
            .execute(&self.pool)
            .await?;

            inserted(
                self.notification_by_id(result.last_insert_id()).await?,
                "notifications",
            )
        }
        .boxed()
    }

    fn find(&self, id: u64) -> StoreFuture<'_, Option<Notification>> {
        self.notification_by_id(id).boxed()
    }

    fn list_for(&self, recipient_id: u64) -> StoreFuture<'_, Vec<Notification>> {
        async move {
            let sql = format!(
                "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE recipient_id = ? ORDER BY created_at DESC, id DESC"
            );
            Ok(sqlx::query_as::<_, Notification>(&sql)
                .bind(recipient_id)
                .fetch_all(&self.pool)
                .await?)
        }
        .boxed()
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<Notification>> {
        async move {
            let sql = format!(
                "SELECT {NOTIFICATION_COLUMNS} FROM notifications ORDER BY created_at DESC, id DESC"
            );
            Ok(sqlx::query_as::<_, Notification>(&sql)
                .fetch_all(&self.pool)
                .await?)
        }
        .boxed()
    }

    fn mark_read(&self, id: u64) -> StoreFuture<'_, Option<Notification>> {
        async move {
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await?;
            self.notification_by_id(id).await
        }
        .boxed()
    }

    fn delete_matching(&self, filter: NotificationMatch) -> StoreFuture<'_, u64> {
        async move {
            let result = sqlx::query(
                r#"
                DELETE FROM notifications
                WHERE recipient_id = ?
                AND link = ?
                AND LOCATE(?, message) > 0
                "#,
            )
            .bind(filter.recipient_id)
            .bind(&filter.link)
            .bind(&filter.message_contains)
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected())
        }
        .boxed()
    }
}

impl UserDirectory for MySqlStore {
    fn find_user(&self, user_id: u64) -> StoreFuture<'_, Option<UserProfile>> {
        async move {
            Ok(sqlx::query_as::<_, UserProfile>(
                r#"
                SELECT u.id AS user_id, u.email, e.first_name, e.last_name
                FROM users u
                LEFT JOIN employees e ON e.user_id = u.id
                WHERE u.id = ?
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
        }
        .boxed()
    }

    fn find_employee(&self, employee_id: u64) -> StoreFuture<'_, Option<UserProfile>> {
        async move {
            Ok(sqlx::query_as::<_, UserProfile>(
                r#"
                SELECT u.id AS user_id, u.email, e.first_name, e.last_name
                FROM employees e
                JOIN users u ON u.id = e.user_id
                WHERE e.id = ?
                "#,
            )
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?)
        }
        .boxed()
    }

    fn hr_recipients(&self, policy: HrNotifyPolicy) -> StoreFuture<'_, Vec<u64>> {
        async move {
            let sql = match policy {
                HrNotifyPolicy::First => "SELECT id FROM users WHERE role = ? ORDER BY id LIMIT 1",
                HrNotifyPolicy::All => "SELECT id FROM users WHERE role = ? ORDER BY id",
            };
            Ok(sqlx::query_scalar::<_, u64>(sql)
                .bind(Role::Hr)
                .fetch_all(&self.pool)
                .await?)
        }
        .boxed()
    }
}

impl AccountStore for MySqlStore {
    fn find_by_email(&self, email: String) -> StoreFuture<'_, Option<Account>> {
        async move {
            Ok(sqlx::query_as::<_, Account>(
                r#"
                SELECT u.id, u.email, u.password_hash, u.role,
                       e.id AS employee_id, e.first_name, e.last_name
                FROM users u
                LEFT JOIN employees e ON e.user_id = u.id
                WHERE u.email = ?
                "#,
            )
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?)
        }
        .boxed()
    }

    fn create_account(&self, new: NewAccount) -> StoreFuture<'_, Account> {
        async move {
            let mut tx = self.pool.begin().await?;

            let user = sqlx::query("INSERT INTO users (email, password_hash, role) VALUES (?, ?, ?)")
                .bind(&new.email)
                .bind(&new.password_hash)
                .bind(new.role)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if is_integrity_violation(&e) {
                        StoreError::Duplicate("Email".into())
                    } else {
                        StoreError::Database(e)
                    }
                })?;
            let user_id = user.last_insert_id();

            let employee = sqlx::query(
                r#"
                INSERT INTO employees (user_id, matricule, first_name, last_name, email)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(user_id)
            .bind(&new.matricule)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(&new.email)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;

            Ok(Account {
                id: user_id,
                email: new.email,
                password_hash: new.password_hash,
                role: new.role,
                employee_id: Some(employee.last_insert_id()),
                first_name: Some(new.first_name),
                last_name: Some(new.last_name),
            })
        }
        .boxed()
    }
}

impl AttendanceStore for MySqlStore {
    fn insert(&self, new: NewAttendance) -> StoreFuture<'_, Attendance> {
        async move {
            let result = sqlx::query(
                r#"
                INSERT INTO attendance (employee_id, date, status, arrival, departure)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(new.employee_id)
            .bind(new.date)
            .bind(new.status)
            .bind(new.arrival)
            .bind(new.departure)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_integrity_violation(&e) {
                    StoreError::Duplicate("Attendance for this date".into())
                } else {
                    StoreError::Database(e)
                }
            })?;

            let sql = format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = ?");
            let row = sqlx::query_as::<_, Attendance>(&sql)
                .bind(result.last_insert_id())
                .fetch_optional(&self.pool)
                .await?;
            inserted(row, "attendance")
        }
        .boxed()
    }

    fn list_for_employee(&self, employee_id: u64) -> StoreFuture<'_, Vec<Attendance>> {
        async move {
            let sql = format!(
                "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE employee_id = ? ORDER BY date DESC, id DESC"
            );
            Ok(sqlx::query_as::<_, Attendance>(&sql)
                .bind(employee_id)
                .fetch_all(&self.pool)
                .await?)
        }
        .boxed()
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<Attendance>> {
        async move {
            let sql =
                format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance ORDER BY date DESC, id DESC");
            Ok(sqlx::query_as::<_, Attendance>(&sql)
                .fetch_all(&self.pool)
                .await?)
        }
        .boxed()
    }

    fn tally(
        &self,
        employee_id: u64,
        from: NaiveDate,
        until: NaiveDate,
    ) -> StoreFuture<'_, AttendanceTally> {
        async move {
            let rows = sqlx::query_as::<_, (AttendanceStatus, i64)>(
                r#"
                SELECT status, COUNT(*)
                FROM attendance
                WHERE employee_id = ?
                AND date >= ?
                AND date < ?
                GROUP BY status
                "#,
            )
            .bind(employee_id)
            .bind(from)
            .bind(until)
            .fetch_all(&self.pool)
            .await?;

            let mut tally = AttendanceTally::default();
            for (status, days) in rows {
                tally.record(status, u32::try_from(days).unwrap_or(u32::MAX));
            }
            Ok(tally)
        }
        .boxed()
    }
}

impl PayrollStore for MySqlStore {
    fn insert(&self, new: NewPayroll) -> StoreFuture<'_, Payroll> {
        async move {
            let result = sqlx::query(
                r#"
                INSERT INTO payroll
                (employee_id, month, base_salary, bonus, deductions, net_salary, status)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(new.employee_id)
            .bind(new.month)
            .bind(new.base_salary)
            .bind(new.bonus)
            .bind(new.deductions)
            .bind(new.net_salary())
            .bind(PayrollStatus::Pending)
            .execute(&self.pool)
            .await?;

            let row = self.payroll_by_id(result.last_insert_id()).await?;
            inserted(row, "payroll")
        }
        .boxed()
    }

    fn find(&self, id: u64) -> StoreFuture<'_, Option<Payroll>> {
        self.payroll_by_id(id).boxed()
    }

    fn mark_paid_if_pending(
        &self,
        id: u64,
        paid_on: NaiveDate,
    ) -> StoreFuture<'_, Option<Payroll>> {
        async move {
            let result = sqlx::query(
                r#"
                UPDATE payroll
                SET status = ?, paid_on = ?
                WHERE id = ?
                AND status = ?
                "#,
            )
            .bind(PayrollStatus::Paid)
            .bind(paid_on)
            .bind(id)
            .bind(PayrollStatus::Pending)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Ok(None);
            }
            self.payroll_by_id(id).await
        }
        .boxed()
    }

    fn list_for_employee(&self, employee_id: u64) -> StoreFuture<'_, Vec<Payroll>> {
        async move {
            let sql = format!(
                "SELECT {PAYROLL_COLUMNS} FROM payroll WHERE employee_id = ? ORDER BY month DESC, id DESC"
            );
            Ok(sqlx::query_as::<_, Payroll>(&sql)
                .bind(employee_id)
                .fetch_all(&self.pool)
                .await?)
        }
        .boxed()
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<Payroll>> {
        async move {
            let sql = format!("SELECT {PAYROLL_COLUMNS} FROM payroll ORDER BY month DESC, id DESC");
            Ok(sqlx::query_as::<_, Payroll>(&sql)
                .fetch_all(&self.pool)
                .await?)
        }
        .boxed()
    }
}
