//! Recipient resolution for incident notifications.
//!
//! Recipients live in the `DESTINATARIOS_EMAIL_INCIDENTES` table. Any
//! failure on the database path degrades to a single default recipient so a
//! notification is never silently dropped.

use std::path::Path;

use log::{info, warn};
use rusqlite::{Connection, OpenFlags};

use crate::types::{NotificationKind, Recipients};

const RECIPIENTS_QUERY: &str = "\
    SELECT EMAIL, TIPO_DESTINATARIO \
    FROM DESTINATARIOS_EMAIL_INCIDENTES \
    WHERE ATIVO = 'S' \
    AND (TIPO_NOTIFICACAO = ?1 OR TIPO_NOTIFICACAO = 'AMBOS') \
    ORDER BY TIPO_DESTINATARIO, ID";

/// Fetch active TO/CC recipients for a notification kind.
///
/// On any failure (missing database, bad schema, query error) the TO list is
/// exactly `[default_recipient]` and CC is empty.
pub fn fetch_recipients(
    db_path: Option<&Path>,
    kind: NotificationKind,
    default_recipient: &str,
) -> Recipients {
    let fallback = || Recipients {
        to: vec![default_recipient.to_string()],
        cc: Vec::new(),
    };

    let Some(path) = db_path else {
        warn!("no recipients database configured, using default recipient");
        return fallback();
    };

    match try_fetch(path, kind) {
        Ok(recipients) => {
            info!(
                "found {} TO and {} CC for {}",
                recipients.to.len(),
                recipients.cc.len(),
                kind.db_value()
            );
            recipients
        }
        Err(e) => {
            warn!("recipient lookup failed ({e}), falling back to default recipient");
            fallback()
        }
    }
}

fn try_fetch(path: &Path, kind: NotificationKind) -> Result<Recipients, rusqlite::Error> {
    // Read-only open so a missing file is an error instead of a fresh db.
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    let mut stmt = conn.prepare(RECIPIENTS_QUERY)?;
    let rows = stmt.query_map([kind.db_value()], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut recipients = Recipients::default();
    for row in rows {
        let (email, tipo) = row?;
        match tipo.as_str() {
            "TO" => recipients.to.push(email),
            "CC" => recipients.cc.push(email),
            other => warn!("ignoring recipient {email} with unknown TIPO_DESTINATARIO {other}"),
        }
    }
    Ok(recipients)
}

#[cfg(test)]
mod tests {
    use super::*;

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
                (1, 'seguranca@example.com', 'TO', 'S', 'CADASTRO'),
                (2, 'gerencia@example.com',  'CC', 'S', 'AMBOS'),
                (3, 'inativo@example.com',   'TO', 'N', 'CADASTRO'),
                (4, 'updates@example.com',   'TO', 'S', 'ATUALIZACAO');",
        )
        .unwrap();
    }

    #[test]
    fn test_partition_to_cc() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("dest.db");
        seed_db(&db);

        let r = fetch_recipients(Some(&db), NotificationKind::Cadastro, "fallback@example.com");
        assert_eq!(r.to, vec!["seguranca@example.com"]);
        assert_eq!(r.cc, vec!["gerencia@example.com"]);
    }

    #[test]
    fn test_kind_filter() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("dest.db");
        seed_db(&db);

        let r = fetch_recipients(Some(&db), NotificationKind::Atualizacao, "fallback@example.com");
        assert_eq!(r.to, vec!["updates@example.com"]);
        assert_eq!(r.cc, vec!["gerencia@example.com"]);
    }

    #[test]
    fn test_fallback_on_missing_database() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.db");

        let r = fetch_recipients(Some(&missing), NotificationKind::Cadastro, "fallback@example.com");
        assert_eq!(r.to, vec!["fallback@example.com"]);
        assert!(r.cc.is_empty());
    }

    #[test]
    fn test_fallback_when_unconfigured() {
        let r = fetch_recipients(None, NotificationKind::Cadastro, "fallback@example.com");
        assert_eq!(r.to, vec!["fallback@example.com"]);
        assert!(r.cc.is_empty());
    }
}
