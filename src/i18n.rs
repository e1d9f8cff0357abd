//! Display language and string translation
//!
//! Message keys are the English strings themselves; a missing entry falls
//! back to the key, so untranslated text (e.g. raw stderr) passes through.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Spanish];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Español",
        }
    }

    /// Match on the two-letter prefix, case-insensitively (`es_AR` → Spanish).
    pub fn from_code(code: &str) -> Option<Self> {
        let prefix: String = code.chars().take(2).collect::<String>().to_lowercase();
        Self::ALL.into_iter().find(|lang| lang.code() == prefix)
    }

    /// Language of a `LANG`-style locale value, English when unset or unsupported.
    pub fn from_locale(locale: Option<&str>) -> Self {
        locale
            .and_then(|value| value.split('.').next())
            .filter(|value| !value.is_empty())
            .and_then(Self::from_code)
            .unwrap_or_default()
    }

    pub fn detect() -> Self {
        Self::from_locale(std::env::var("LANG").ok().as_deref())
    }

    /// The next language in menu order, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Resolves message keys into display text.
pub trait Translator {
    fn translate(&self, key: &str) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translations {
    language: Language,
}

impl Translations {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl Translator for Translations {
    fn translate(&self, key: &str) -> String {
        let text = match self.language {
            Language::English => english(key),
            Language::Spanish => spanish(key),
        };
        text.unwrap_or(key).to_string()
    }
}

fn english(key: &str) -> Option<&'static str> {
    Some(match key {
        "A simple system management tool for Linux systems." => {
            "A simple system management tool for CuerdOS."
        }
        "Project Website" => "Website",
        _ => return None,
    })
}

fn spanish(key: &str) -> Option<&'static str> {
    Some(match key {
        // ===== Menu =====
        "File" => "Archivo",
        "Help" => "Ayuda",
        "About" => "Acerca de",
        "Quit" => "Salir",
        "Language" => "Idioma",

        // ===== Main window =====
        "System Management" => "Gestión del Sistema",
        "Update Repositories" => "Actualizar Repositorios",
        "Upgrade Packages" => "Actualizar Paquetes",
        "Update Flatpak" => "Actualizar Flatpak",
        "Clean Packages" => "Limpiar Paquetes",
        "Autoremove" => "Autoremover",
        "Update All" => "Actualizar Todo",
        "System Status" => "Estado del Sistema",
        "↑↓ select · Enter run · 1-7 shortcut · L language · A about · q quit" => {
            "↑↓ elegir · Enter ejecutar · 1-7 atajo · L idioma · A acerca de · q salir"
        }

        // ===== Progress =====
        "Starting..." => "Iniciando...",
        "Cancel" => "Cancelar",
        "Cancelling..." => "Cancelando...",
        "Completed" => "Completado",
        "Error" => "Error",
        "Progress" => "Progreso",
        "Output" => "Salida",
        "Esc cancel · ↑↓ scroll" => "Esc cancelar · ↑↓ desplazar",
        "Enter/Esc back · ↑↓ scroll" => "Enter/Esc volver · ↑↓ desplazar",

        // ===== Status bar =====
        "User" => "Usuario",

        // ===== About =====
        "A simple system management tool for Linux systems." => {
            "Una herramienta simple de gestión del sistema para CuerdOS."
        }
        "Project Website" => "Pagina Web",

        // ===== Messages =====
        "Language Changed" => "Idioma Cambiado",
        "Language has been updated." => "El idioma ha sido actualizado.",
        "Authentication failed" => "La autenticación falló",

        // ===== Operation status =====
        "Updating repositories..." => "Actualizando repositorios...",
        "Upgrading packages..." => "Actualizando paquetes...",
        "Updating Flatpak applications..." => "Actualizando aplicaciones Flatpak...",
        "Cleaning package cache..." => "Limpiando caché de paquetes...",
        "Removing unused packages..." => "Eliminando paquetes sin usar...",
        "Updating everything..." => "Actualizando todo...",
        "Checking system status..." => "Verificando estado del sistema...",
        "Checking Disk Usage..." => "Verificando uso de disco...",
        "Checking Memory Usage..." => "Verificando uso de memoria...",
        "Checking System Uptime..." => "Verificando tiempo de actividad...",
        "Checking Updates Available..." => "Verificando actualizaciones disponibles...",

        // ===== Results =====
        "Task completed successfully" => "Tarea completada con éxito",
        "Task failed" => "La tarea falló",
        "Operation cancelled" => "Operación cancelada",
        "Operation Successful" => "Operación Exitosa",
        "Operation Failed" => "Operación Fallida",
        "Packages updated" => "Paquetes actualizados",
        "Newly installed" => "Nuevamente instalados",
        "To remove" => "Para eliminar",
        "Flatpak apps updated" => "Aplicaciones Flatpak actualizadas",
        "Packages removed" => "Paquetes eliminados",
        "Repositories updated successfully" => "Repositorios actualizados con éxito",
        "Packages upgraded successfully" => "Paquetes actualizados con éxito",
        "Flatpak applications updated successfully" => {
            "Aplicaciones Flatpak actualizadas con éxito"
        }
        "Package cache cleaned successfully" => "Caché de paquetes limpiada con éxito",
        "Unused packages removed successfully" => "Paquetes sin usar eliminados con éxito",
        "All updates completed successfully" => "Todas las actualizaciones completadas con éxito",
        "System status check completed" => "Verificación del estado del sistema completada",
        _ => return None,
    })
}
