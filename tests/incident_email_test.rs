//! End-to-end notification assembly: incident JSON in, addressed multipart
//! message out, with recipient resolution against a real SQLite file.

use std::path::Path;

use incon_tools::config::Config;
use incon_tools::email::message;
use incon_tools::infrastructure::recipients::fetch_recipients;
use incon_tools::types::{Incident, NotificationKind};
use rusqlite::Connection;

const INCIDENT_JSON: &str = r#"{
    "N_BENNER": "TESTE/123456-99",
    "N_SM": "SM77001",
    "TIPO_INCIDENTE": "Roubo de carga",
    "DATA_INCIDENTE": "02/03/2024",
    "HORA_INCIDENTE": "04:30",
    "REGIAO_INCIDENTE": "Sudeste",
    "ESTADO_INCIDENTE": "SP",
    "CIDADE_INCIDENTE": "Guarulhos",
    "PLACA_CAVALO": "ABC1D23",
    "DESCRICAO_INCIDENTE": "Veículo interceptado na rodovia.",
    "data_hora_registro": "02/03/2024 06:10:00",
    "usuario_responsavel": "PLANTONISTA",
    "clientes": [
        {
            "CLIENTE_INCON": "Cliente A",
            "SETOR": "Eletrônicos",
            "VALOR_CARGA_BENNER": 150000.0,
            "VALOR_RECUPERADO": 90000.0,
            "VALOR_PERDIDO": 60000.0
        }
    ]
}"#;

fn seed_db(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE DESTINATARIOS_EMAIL_INCIDENTES (
            ID INTEGER PRIMARY KEY,
            EMAIL TEXT NOT NULL,
            TIPO_DESTINATARIO TEXT NOT NULL,
            ATIVO TEXT NOT NULL,
            TIPO_NOTIFICACAO TEXT NOT NULL
         );
         INSERT INTO DESTINATARIOS_EMAIL_INCIDENTES VALUES
            (1, 'plantao@example.com',  'TO', 'S', 'CADASTRO'),
            (2, 'diretoria@example.com','CC', 'S', 'AMBOS'),
            (3, 'antigo@example.com',   'TO', 'N', 'AMBOS');",
    )
    .unwrap();
}

#[test]
fn test_full_notification_from_json_and_db() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("destinatarios.db");
    seed_db(&db);

    let incident: Incident = serde_json::from_str(INCIDENT_JSON).unwrap();
    let recipients = fetch_recipients(
        Some(&db),
        NotificationKind::Cadastro,
        "fallback@example.com",
    );
    assert_eq!(recipients.to, vec!["plantao@example.com"]);
    assert_eq!(recipients.cc, vec!["diretoria@example.com"]);

    let config = Config::default();
    let msg = message::build_message(
        &config,
        &incident,
        "LOG2024-001",
        NotificationKind::Cadastro,
        &recipients,
    )
    .unwrap();

    let raw = String::from_utf8(msg.formatted()).unwrap();
    assert!(raw.contains("To: plantao@example.com"));
    assert!(raw.contains("Cc: diretoria@example.com"));
    assert!(raw.contains("multipart/alternative"));
}

#[test]
fn test_subject_marks_updates() {
    assert_eq!(
        message::subject(NotificationKind::Cadastro, "LOG2024-001"),
        "Comunicado de Incidente - LOG2024-001"
    );
    assert_eq!(
        message::subject(NotificationKind::Atualizacao, "LOG2024-001"),
        "ATUALIZAÇÃO de Incidente - LOG2024-001"
    );
}

#[test]
fn test_plain_body_sections() {
    let incident: Incident = serde_json::from_str(INCIDENT_JSON).unwrap();
    let text = message::render_plain(&incident, "LOG2024-001", NotificationKind::Cadastro);

    assert!(text.contains("COMUNICADO DE INCIDENTE - SISTEMA INCON"));
    assert!(text.contains("Incidente LOGICS: LOG2024-001"));
    assert!(text.contains("• Tipo de Incidente: Roubo de carga"));
    assert!(text.contains("• Cidade: Guarulhos"));
    // unset field renders the sentinel
    assert!(text.contains("• Origem: NÃO INFORMADO"));
    // money formatted as BRL
    assert!(text.contains("Valor Carga: R$ 150.000,00"));
    assert!(text.contains("• Valor Total Perdido: R$ 60.000,00"));
    assert!(text.contains("Email gerado automaticamente pelo Sistema INCON"));
}

#[test]
fn test_recipient_fallback_when_db_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such.db");

    let recipients = fetch_recipients(
        Some(&missing),
        NotificationKind::Atualizacao,
        "fallback@example.com",
    );
    assert_eq!(recipients.to, vec!["fallback@example.com"]);
    assert!(recipients.cc.is_empty());
}

#[test]
fn test_fallback_on_broken_schema() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("broken.db");
    Connection::open(&db)
        .unwrap()
        .execute_batch("CREATE TABLE OUTRA_TABELA (X INTEGER);")
        .unwrap();

    let recipients = fetch_recipients(
        Some(&db),
        NotificationKind::Cadastro,
        "fallback@example.com",
    );
    assert_eq!(recipients.to, vec!["fallback@example.com"]);
}
