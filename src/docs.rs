use crate::api::attendance::{AttendanceListResponse, AttendanceReq};
use crate::api::leave_request::{
    AdjudicationReq, LeaveListResponse, LeaveMessageResponse, LeaveResponse,
};
use crate::api::notification::{NotificationListResponse, NotificationReq};
use crate::api::payroll::{PaymentReq, PayrollListResponse, PayrollReq};
use crate::model::{
    attendance::{Attendance, AttendanceStatus},
    leave_request::{LeaveDraft, LeavePatch, LeaveRequest, LeaveStatus},
    notification::Notification,
    payroll::{Payroll, PayrollStatus},
    role::Role,
};
use crate::models::{LoginReqDto, RegisterReq, TokenResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Leave Service API",
        version = "1.0.0",
        description = r#"
## Human Resource Management: leave lifecycle

- **Leave requests**: file, modify or cancel while pending; HR/admin approve or reject
- **Notifications**: every leave transition notifies HR and the requester
- **Attendance**: daily presence records, self-service or recorded by HR
- **Payroll**: monthly payroll with an attendance-based bonus, settled by HR

Protected paths are listed under the default `/api` prefix; a server started
with another `API_PREFIX` serves them under that prefix instead.
Protected endpoints need `Authorization: Bearer <token>` from `/auth/login`.
Errors are returned as `{"error": "<message>"}`.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::list_own_leaves,
        crate::api::leave_request::list_pending_leaves,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::modify_leave,
        crate::api::leave_request::cancel_leave,
        crate::api::leave_request::adjudicate_leave,

        crate::api::notification::list_own_notifications,
        crate::api::notification::mark_notification_read,
        crate::api::notification::create_notification,
        crate::api::notification::list_all_notifications,

        crate::api::attendance::record_attendance,
        crate::api::attendance::list_own_attendance,
        crate::api::attendance::list_all_attendance,

        crate::api::payroll::create_payroll,
        crate::api::payroll::mark_payroll_paid,
        crate::api::payroll::list_own_payrolls,
        crate::api::payroll::list_all_payrolls
    ),
    components(
        schemas(
            RegisterReq,
            LoginReqDto,
            TokenResponse,
            Role,
            LeaveRequest,
            LeaveStatus,
            LeaveDraft,
            LeavePatch,
            AdjudicationReq,
            LeaveResponse,
            LeaveListResponse,
            LeaveMessageResponse,
            Notification,
            NotificationReq,
            NotificationListResponse,
            Attendance,
            AttendanceStatus,
            AttendanceReq,
            AttendanceListResponse,
            Payroll,
            PayrollStatus,
            PayrollReq,
            PaymentReq,
            PayrollListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Leave", description = "Leave request lifecycle"),
        (name = "Notifications", description = "User notifications"),
        (name = "Attendance", description = "Attendance records"),
        (name = "Payroll", description = "Payroll management"),
    )
)]
pub struct ApiDoc;

/// Declares the `bearer_auth` scheme referenced by protected paths.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
