//! Core record types shared across the two tools.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One valid row of the tracking spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPoint {
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub event: String,
    pub ignition: String,
    pub observation: String,
    /// Category label (`Tipo`, falling back to `Veículo`, then "Geral").
    pub category: String,
    /// Person name attached to the point, empty when absent.
    pub person_name: String,
}

/// Points collapsed by identical (latitude, longitude, category).
///
/// The per-row lists keep input order; `ignition` is the last row's state and
/// `person_name` the first row's name, matching how the operations team reads
/// the source sheet.
#[derive(Debug, Clone)]
pub struct TrackGroup {
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub timestamps: Vec<NaiveDateTime>,
    pub events: Vec<String>,
    pub observations: Vec<String>,
    pub ignition: String,
    pub person_name: String,
}

impl TrackGroup {
    /// Earliest timestamp of the group; grouping guarantees at least one row.
    pub fn first_timestamp(&self) -> NaiveDateTime {
        *self.timestamps.iter().min().expect("group holds at least one row")
    }

    pub fn has_valid_name(&self) -> bool {
        crate::text::is_valid_name(&self.person_name)
    }
}

/// A checkpoint extracted from a KMZ/KML file.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub address: String,
    /// Monetary value in centavos, when the placemark carries one.
    pub valor_centavos: Option<i64>,
}

impl Checkpoint {
    pub fn valor_formatted(&self) -> Option<String> {
        self.valor_centavos.map(crate::money::format_brl)
    }
}

/// Which notification stream a recipient subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Cadastro,
    Atualizacao,
}

impl NotificationKind {
    /// Value stored in the `TIPO_NOTIFICACAO` column.
    pub fn db_value(&self) -> &'static str {
        match self {
            NotificationKind::Cadastro => "CADASTRO",
            NotificationKind::Atualizacao => "ATUALIZACAO",
        }
    }
}

/// Resolved TO/CC lists for one notification.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Recipients {
    pub to: Vec<String>,
    pub cc: Vec<String>,
}

impl Recipients {
    pub fn is_empty(&self) -> bool {
        self.to.is_empty() && self.cc.is_empty()
    }

    /// TO ∪ CC without duplicates, first occurrence wins.
    pub fn all_unique(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for addr in self.to.iter().chain(self.cc.iter()) {
            if !seen.contains(addr) {
                seen.push(addr.clone());
            }
        }
        seen
    }
}

/// Per-client monetary sub-record of an incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientValues {
    #[serde(rename = "CLIENTE_INCON", default)]
    pub cliente: Option<String>,
    #[serde(rename = "SETOR", default)]
    pub setor: Option<String>,
    #[serde(rename = "VALOR_CARGA_BENNER", default)]
    pub valor_carga: f64,
    #[serde(rename = "VALOR_RECUPERADO", default)]
    pub valor_recuperado: f64,
    #[serde(rename = "VALOR_PERDIDO", default)]
    pub valor_perdido: f64,
}

/// Flat incident record as registered in the system. Field names follow the
/// upstream database columns so exported JSON loads unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Incident {
    #[serde(rename = "N_BENNER", default)]
    pub n_benner: Option<String>,
    #[serde(rename = "N_SM", default)]
    pub n_sm: Option<String>,
    #[serde(rename = "OCORRENCIA", default)]
    pub ocorrencia: Option<String>,
    #[serde(rename = "TIPO_INCIDENTE", default)]
    pub tipo_incidente: Option<String>,
    #[serde(rename = "DATA_INCIDENTE", default)]
    pub data_incidente: Option<String>,
    #[serde(rename = "HORA_INCIDENTE", default)]
    pub hora_incidente: Option<String>,
    #[serde(rename = "PERIODO_INCIDENTE", default)]
    pub periodo_incidente: Option<String>,

    #[serde(rename = "REGIAO_INCIDENTE", default)]
    pub regiao: Option<String>,
    #[serde(rename = "ESTADO_INCIDENTE", default)]
    pub estado: Option<String>,
    #[serde(rename = "CIDADE_INCIDENTE", default)]
    pub cidade: Option<String>,
    #[serde(rename = "END_INCIDENTE", default)]
    pub endereco: Option<String>,
    #[serde(rename = "ESTRADA_URBANA", default)]
    pub estrada_urbana: Option<String>,
    #[serde(rename = "LATITUDE", default)]
    pub latitude: Option<String>,
    #[serde(rename = "LONGITUDE", default)]
    pub longitude: Option<String>,

    #[serde(rename = "TRANSPORTADOR_INCIDENTES", default)]
    pub transportador: Option<String>,
    #[serde(rename = "TRANSPORTE", default)]
    pub fase_transporte: Option<String>,
    #[serde(rename = "PLACA_CAVALO", default)]
    pub placa_cavalo: Option<String>,
    #[serde(rename = "PLACA_BAU", default)]
    pub placa_bau: Option<String>,
    #[serde(rename = "CPF_MOTORISTA", default)]
    pub cpf_motorista: Option<String>,
    #[serde(rename = "RASTREADO_POR", default)]
    pub rastreado_por: Option<String>,
    #[serde(rename = "TRACKING_CELL", default)]
    pub tracking_cell: Option<String>,

    #[serde(rename = "FALHA_RM", default)]
    pub falha_rm: Option<String>,
    #[serde(rename = "END_CAMINHAO", default)]
    pub end_caminhao: Option<String>,
    #[serde(rename = "END_CARGA", default)]
    pub end_carga: Option<String>,
    #[serde(rename = "ORIGEM", default)]
    pub origem: Option<String>,
    #[serde(rename = "DESTINO", default)]
    pub destino: Option<String>,

    #[serde(rename = "DESCRICAO_INCIDENTE", default)]
    pub descricao: Option<String>,

    #[serde(rename = "clientes", default)]
    pub clientes: Vec<ClientValues>,

    #[serde(rename = "data_hora_registro", default)]
    pub data_hora_registro: Option<String>,
    #[serde(rename = "usuario_responsavel", default)]
    pub usuario_responsavel: Option<String>,
}
