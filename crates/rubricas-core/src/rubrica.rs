//! The rubrica record shared by the bulk listing and the per-record detail files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A payroll line-item classification ("rubrica").
///
/// `codigo` is the join key between the bulk listing and the detail source.
/// Everything else is optional: listing entries usually carry only
/// `codigo`/`nome`/`descricao`, detail files carry the tax and repercussion
/// fields. Fields this type does not know about are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rubrica {
    #[serde(default)]
    pub codigo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inss_incidencia: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inss_classificacao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inss_baselegal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ir_incidencia: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ir_classificacao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ir_baselegal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fgts_incidencia: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fgts_classificacao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fgts_baselegal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cs_incidencia: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cs_classificacao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cs_baselegal: Option<String>,

    /// Repercussion flags: `Some(true)` applies, `Some(false)` explicitly
    /// does not apply, `None` not stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dsr: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ferias: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aviso_previo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimo_terceiro_salario: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub afastamento: Option<bool>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Tax categories a rubrica can be classified under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxCategory {
    Inss,
    Ir,
    Fgts,
    /// Contribuição sindical.
    Cs,
}

impl TaxCategory {
    pub const ALL: [TaxCategory; 4] = [Self::Inss, Self::Ir, Self::Fgts, Self::Cs];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Inss => "INSS",
            Self::Ir => "Imposto de Renda",
            Self::Fgts => "FGTS",
            Self::Cs => "Contribuição Sindical",
        }
    }
}

/// Borrowed view of one tax category's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxIncidence<'a> {
    pub incidencia: Option<&'a str>,
    pub classificacao: Option<&'a str>,
    pub baselegal: Option<&'a str>,
}

impl TaxIncidence<'_> {
    pub fn is_empty(&self) -> bool {
        self.incidencia.is_none() && self.classificacao.is_none() && self.baselegal.is_none()
    }
}

/// Payroll items a rubrica may have repercussion on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repercussion {
    Dsr,
    Ferias,
    AvisoPrevio,
    DecimoTerceiroSalario,
    Afastamento,
}

impl Repercussion {
    pub const ALL: [Repercussion; 5] = [
        Self::Dsr,
        Self::Ferias,
        Self::AvisoPrevio,
        Self::DecimoTerceiroSalario,
        Self::Afastamento,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dsr => "DSR",
            Self::Ferias => "Férias",
            Self::AvisoPrevio => "Aviso Prévio",
            Self::DecimoTerceiroSalario => "13º Salário",
            Self::Afastamento => "Afastamento",
        }
    }
}

impl Rubrica {
    /// The code, or `None` when the payload left it out or blank.
    pub fn codigo(&self) -> Option<&str> {
        present(Some(&self.codigo))
    }

    pub fn nome(&self) -> Option<&str> {
        present(self.nome.as_ref())
    }

    pub fn descricao(&self) -> Option<&str> {
        present(self.descricao.as_ref())
    }

    pub fn tipo(&self) -> Option<&str> {
        present(self.tipo.as_ref())
    }

    pub fn incidence(&self, category: TaxCategory) -> TaxIncidence<'_> {
        let (incidencia, classificacao, baselegal) = match category {
            TaxCategory::Inss => (
                &self.inss_incidencia,
                &self.inss_classificacao,
                &self.inss_baselegal,
            ),
            TaxCategory::Ir => (
                &self.ir_incidencia,
                &self.ir_classificacao,
                &self.ir_baselegal,
            ),
            TaxCategory::Fgts => (
                &self.fgts_incidencia,
                &self.fgts_classificacao,
                &self.fgts_baselegal,
            ),
            TaxCategory::Cs => (
                &self.cs_incidencia,
                &self.cs_classificacao,
                &self.cs_baselegal,
            ),
        };
        TaxIncidence {
            incidencia: present(incidencia.as_ref()),
            classificacao: present(classificacao.as_ref()),
            baselegal: present(baselegal.as_ref()),
        }
    }

    pub fn repercussion(&self, flag: Repercussion) -> Option<bool> {
        match flag {
            Repercussion::Dsr => self.dsr,
            Repercussion::Ferias => self.ferias,
            Repercussion::AvisoPrevio => self.aviso_previo,
            Repercussion::DecimoTerceiroSalario => self.decimo_terceiro_salario,
            Repercussion::Afastamento => self.afastamento,
        }
    }
}

/// Blank strings count as absent.
fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}
