// [libs/domain/projections/src/principal.rs]
/*!
 * =================================================================
 * APARATO: VERIFIED PRINCIPAL CONTRACT (V2.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2 - AUTH BOUNDARY)
 * RESPONSABILIDAD: PORTÓN DE ROLES SOBRE EL PAR VERIFICADO {sub, role}
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. BOUNDARY CONSUMER: La emisión y verificación de tokens viven en
 *    el colaborador de autenticación; este aparato sólo consume el par
 *    verificado y aplica el portón antes de construir una vista.
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ProjectionError;

/// Rol de consumo de las vistas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Regulator,
    Investor,
    Public,
}

impl Role {
    pub fn as_label(self) -> &'static str {
        match self {
            Role::Regulator => "regulator",
            Role::Investor => "investor",
            Role::Public => "public",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_label())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(raw_label: &str) -> Result<Self, Self::Err> {
        match raw_label {
            "regulator" => Ok(Role::Regulator),
            "investor" => Ok(Role::Investor),
            "public" => Ok(Role::Public),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Principal ya verificado por el colaborador de autenticación.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Sujeto (nombre de usuario u identificador opaco).
    pub sub: String,
    pub role: Role,
}

impl Principal {
    pub fn new(sub: impl Into<String>, role: Role) -> Self {
        Self { sub: sub.into(), role }
    }

    /// Exige el rol dado antes de invocar la proyección correspondiente.
    pub fn require(&self, required_role: Role) -> Result<(), ProjectionError> {
        if self.role == required_role {
            Ok(())
        } else {
            Err(ProjectionError::ForbiddenRole {
                required: required_role.as_label(),
                actual: self.role.to_string(),
            })
        }
    }
}
