pub mod attendance;
pub mod leave_request;
pub mod notification;
pub mod payroll;
pub mod role;
pub mod user;

use crate::error::AppError;

/// Character widths of the bounded text columns.
pub const LEAVE_TYPE_MAX: usize = 32;
pub const NAME_MAX: usize = 100;
pub const EMAIL_MAX: usize = 255;
pub const LINK_MAX: usize = 255;
/// Keeps a 4-byte-per-char string inside a TEXT column.
pub const TEXT_MAX: usize = 16_000;

/// Rejects `value` when it would not fit a column of `max` characters.
pub fn check_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Stores a strum-backed enum as its string form in a VARCHAR column.
macro_rules! text_column {
    ($ty:ty) => {
        impl sqlx::Type<sqlx::MySql> for $ty {
            fn type_info() -> sqlx::mysql::MySqlTypeInfo {
                <String as sqlx::Type<sqlx::MySql>>::type_info()
            }

            fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::MySql>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::MySql> for $ty {
            fn encode_by_ref(&self, buf: &mut Vec<u8>) -> sqlx::encode::IsNull {
                let s = self.to_string();
                <String as sqlx::Encode<'q, sqlx::MySql>>::encode_by_ref(&s, buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::MySql> for $ty {
            fn decode(
                value: sqlx::mysql::MySqlValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <String as sqlx::Decode<'r, sqlx::MySql>>::decode(value)?;
                s.parse::<$ty>().map_err(Into::into)
            }
        }
    };
}

pub(crate) use text_column;
