//! User-facing messages

use crate::domain::{Role, RoleSet};
use crate::shared::ClientError;

pub const BACK: &str = "Назад";
pub const SIGN_IN_REQUIRED: &str = "Сессия истекла, войдите снова";

pub const INVALID_CREDENTIALS: &str = "Неверные credentials";
pub const FIRST_LOGIN: &str = "Первый вход: смените пароль";
pub const PASSWORD_CHANGED: &str = "Пароль успешно изменён";
pub const PASSWORDS_DIFFER: &str = "Пароли не совпадают";
pub const PASSWORD_TOO_SHORT: &str = "Пароль должен быть минимум 6 символов";
pub const USERNAME_LENGTH: &str = "Имя пользователя должно быть 3-50 символов";
pub const NO_PENDING_USER: &str = "Нет пользователя, ожидающего смены пароля";

pub const WORKPLACE_NOT_FOUND: &str = "Компьютера с таким именем нет";
pub const DESERIALIZATION_FAILED: &str = "Ошибка десериализации данных";
pub const REQUIRED_FIELDS: &str = "Заполните имя, локацию и ПК";
pub const NAME_REQUIRED: &str = "Введите имя рабочего места";
pub const SEARCH_FIRST: &str = "Сначала найдите рабочее место";
pub const SAVED: &str = "Сохранено успешно";
pub const QR_MISSING: &str = "QR-код отсутствует в ответе";

pub const USER_CREATED: &str = "Пользователь создан";
pub const NO_USERS: &str = "Нет пользователей";
pub const USER_NOT_FOUND: &str = "Пользователь не найден";
pub const USER_DELETE_FAILED: &str = "Ошибка удаления";

/// Generic description of a client error
pub fn describe(err: &ClientError) -> String {
    match err {
        ClientError::Status { status: 401, .. } => "Требуется авторизация".to_string(),
        ClientError::Status { status: 404, .. } => "Не найдено".to_string(),
        ClientError::Status { status: 409, .. } => "Конфликт имён".to_string(),
        ClientError::Status { status, body } if body.is_empty() => format!("Ошибка: {status}"),
        ClientError::Status { status, body } => format!("Ошибка: {status} {body}"),
        ClientError::SessionExpired => SIGN_IN_REQUIRED.to_string(),
        ClientError::Decode(_) => DESERIALIZATION_FAILED.to_string(),
        other => format!("Ошибка: {other}"),
    }
}

pub fn access_denied(permitted: RoleSet) -> String {
    let names: Vec<&str> = permitted
        .roles()
        .iter()
        .filter(|role| role.is_authenticated())
        .map(Role::as_str)
        .collect();

    match names.as_slice() {
        [] => "Доступ запрещён.".to_string(),
        [one] => format!("Доступ запрещён. Только для {one}."),
        [init @ .., last] => format!("Доступ запрещён. Только для {} и {last}.", init.join(", ")),
    }
}

pub fn workplace_exists(name: &str) -> String {
    format!("Рабочее место с именем '{name}' уже существует.")
}

pub fn create_failed(err: &ClientError) -> String {
    match err {
        ClientError::Status { body, .. } => format!("Ошибка создания: {body}"),
        other => describe(other),
    }
}

pub fn qr_failed(err: &ClientError) -> String {
    match err {
        ClientError::Qr(e) => format!("Ошибка декодирования QR-кода: {e}"),
        other => format!("Ошибка загрузки QR-кода: {}", describe(other)),
    }
}

pub fn save_failed(status: u16) -> String {
    format!("Ошибка сохранения: {status}")
}

pub fn workplace_deleted(name: &str) -> String {
    format!("Рабочее место '{name}' успешно удалено.")
}

pub fn workplace_missing(name: &str) -> String {
    format!("Рабочее место '{name}' не найдено.")
}

pub fn password_change_failed(err: &ClientError) -> String {
    match err {
        ClientError::Status { body, .. } => format!("Ошибка смены пароля: {body}"),
        other => describe(other),
    }
}

pub fn users_failed(err: &ClientError) -> String {
    match err {
        ClientError::Status { status, body } => {
            format!("Ошибка загрузки пользователей: {status} - {body}")
        }
        other => describe(other),
    }
}

pub fn user_deleted(display_name: &str) -> String {
    format!("Пользователь {display_name} удалён")
}

pub fn user_delete_failed(err: &ClientError) -> String {
    match err {
        ClientError::Status { status: 404, .. } => USER_NOT_FOUND.to_string(),
        ClientError::Status { status: 400, body } if !body.is_empty() => body.clone(),
        ClientError::Status { status: 400, .. } => USER_DELETE_FAILED.to_string(),
        ClientError::Status { status, .. } => format!("{USER_DELETE_FAILED}: {status}"),
        other => describe(other),
    }
}

pub fn load_failed(err: &impl std::fmt::Display) -> String {
    format!("Ошибка загрузки: {err}")
}

pub fn append_failed(err: &impl std::fmt::Display) -> String {
    format!("Ошибка подгрузки: {err}")
}
