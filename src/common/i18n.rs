// src/common/i18n.rs

use std::collections::HashMap;

// Catálogo de mensagens por idioma. A chave é o `code` do AppError
// (ou o código de um aviso de sucesso do cliente).
// Idiomas suportados: en (padrão), pt, vi.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

pub const DEFAULT_LANG: &str = "en";

const EN: &[(&str, &str)] = &[
    ("VALIDATION_FAILED", "One or more fields are invalid."),
    ("INVALID_CREDENTIALS", "Invalid employee ID or password."),
    ("INVALID_TOKEN", "Authentication token is invalid or missing."),
    ("SERVICE_UNAVAILABLE", "The service is unavailable. Please try again."),
    ("PASSWORD_MISMATCH", "Password confirmation does not match."),
    ("PASSWORD_TOO_SHORT", "The new password must have at least 6 characters."),
    ("PASSWORD_CHANGE_REQUIRED", "You must change your password before continuing."),
    ("FORBIDDEN", "You do not have permission to perform this action."),
    ("NOT_FOUND", "Record not found."),
    ("EMPLOYEE_ID_ALREADY_EXISTS", "This employee ID is already in use."),
    ("EMAIL_ALREADY_EXISTS", "This e-mail is already in use."),
    ("CANNOT_DELETE_SELF", "You cannot delete your own account."),
    ("INTERNAL_ERROR", "An unexpected error occurred."),
    // Avisos de sucesso do cliente
    ("RECORD_CREATED", "Record created."),
    ("RECORD_UPDATED", "Record updated."),
    ("RECORD_DELETED", "Record deleted."),
    ("PASSWORD_CHANGED", "Password changed."),
];

const PT: &[(&str, &str)] = &[
    ("VALIDATION_FAILED", "Um ou mais campos são inválidos."),
    ("INVALID_CREDENTIALS", "Código de funcionário ou senha inválidos."),
    ("INVALID_TOKEN", "Token de autenticação inválido ou ausente."),
    ("SERVICE_UNAVAILABLE", "Serviço indisponível. Tente novamente."),
    ("PASSWORD_MISMATCH", "A confirmação da senha não confere."),
    ("PASSWORD_TOO_SHORT", "A nova senha deve ter no mínimo 6 caracteres."),
    ("PASSWORD_CHANGE_REQUIRED", "Você precisa trocar a senha antes de continuar."),
    ("FORBIDDEN", "Você não tem permissão para realizar esta ação."),
    ("NOT_FOUND", "Registro não encontrado."),
    ("EMPLOYEE_ID_ALREADY_EXISTS", "Este código de funcionário já está em uso."),
    ("EMAIL_ALREADY_EXISTS", "Este e-mail já está em uso."),
    ("CANNOT_DELETE_SELF", "Você não pode excluir a própria conta."),
    ("INTERNAL_ERROR", "Ocorreu um erro inesperado."),
    // Avisos de sucesso do cliente
    ("RECORD_CREATED", "Registro criado."),
    ("RECORD_UPDATED", "Registro atualizado."),
    ("RECORD_DELETED", "Registro excluído."),
    ("PASSWORD_CHANGED", "Senha alterada."),
];

const VI: &[(&str, &str)] = &[
    ("VALIDATION_FAILED", "Một hoặc nhiều trường không hợp lệ."),
    ("INVALID_CREDENTIALS", "Mã nhân viên hoặc mật khẩu không đúng."),
    ("INVALID_TOKEN", "Phiên đăng nhập không hợp lệ hoặc đã hết hạn."),
    ("SERVICE_UNAVAILABLE", "Dịch vụ tạm thời không khả dụng. Vui lòng thử lại."),
    ("PASSWORD_MISMATCH", "Mật khẩu xác nhận không khớp."),
    ("PASSWORD_TOO_SHORT", "Mật khẩu mới phải có ít nhất 6 ký tự."),
    ("PASSWORD_CHANGE_REQUIRED", "Bạn cần đổi mật khẩu mặc định để tiếp tục."),
    ("FORBIDDEN", "Bạn không có quyền thực hiện thao tác này."),
    ("NOT_FOUND", "Không tìm thấy bản ghi."),
    ("EMPLOYEE_ID_ALREADY_EXISTS", "Mã nhân viên đã tồn tại."),
    ("EMAIL_ALREADY_EXISTS", "Email đã được sử dụng."),
    ("CANNOT_DELETE_SELF", "Không thể xóa tài khoản của chính bạn."),
    ("INTERNAL_ERROR", "Đã xảy ra lỗi không mong muốn."),
    // Avisos de sucesso do cliente
    ("RECORD_CREATED", "Đã tạo bản ghi."),
    ("RECORD_UPDATED", "Đã cập nhật bản ghi."),
    ("RECORD_DELETED", "Đã xóa bản ghi."),
    ("PASSWORD_CHANGED", "Đổi mật khẩu thành công."),
];

impl Default for I18nStore {
    fn default() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("en", EN.iter().copied().collect());
        catalogs.insert("pt", PT.iter().copied().collect());
        catalogs.insert("vi", VI.iter().copied().collect());
        Self { catalogs }
    }
}

impl I18nStore {
    /// Traduz um código. Idioma desconhecido cai no inglês; código desconhecido volta ele mesmo.
    pub fn translate(&self, lang: &str, code: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|catalog| catalog.get(code))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|catalog| catalog.get(code)))
            .map(|message| message.to_string())
            .unwrap_or_else(|| code.to_string())
    }
}
