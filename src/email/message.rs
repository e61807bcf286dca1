//! Incident notification rendering: subject, plain-text and HTML bodies.

use chrono::Local;
use lettre::message::{Mailbox, MultiPart};
use lettre::Message;

use crate::config::Config;
use crate::error::Result;
use crate::money::{format_brl, reais_to_centavos};
use crate::text::html_escape;
use crate::types::{Incident, NotificationKind, Recipients};

/// Placeholder for fields the operator left blank.
pub const NOT_INFORMED: &str = "NÃO INFORMADO";

/// Sentinel values treated the same as an absent field.
const EMPTY_SENTINELS: &[&str] = &["", "N/A", "Selecione uma informação", NOT_INFORMED];

/// A field value or the standard placeholder.
fn fill(value: &Option<String>) -> &str {
    match value {
        Some(v) if !EMPTY_SENTINELS.contains(&v.trim()) => v,
        _ => NOT_INFORMED,
    }
}

pub fn subject(kind: NotificationKind, incident_id: &str) -> String {
    match kind {
        NotificationKind::Cadastro => format!("Comunicado de Incidente - {incident_id}"),
        NotificationKind::Atualizacao => format!("ATUALIZAÇÃO de Incidente - {incident_id}"),
    }
}

/// Build the full multipart (plain + HTML) message.
pub fn build_message(
    config: &Config,
    incident: &Incident,
    incident_id: &str,
    kind: NotificationKind,
    recipients: &Recipients,
) -> Result<Message> {
    let from: Mailbox = config.sender_email.parse()?;

    let mut builder = Message::builder().from(from).subject(subject(kind, incident_id));
    for addr in &recipients.to {
        builder = builder.to(addr.parse()?);
    }
    for addr in &recipients.cc {
        builder = builder.cc(addr.parse()?);
    }

    let plain = render_plain(incident, incident_id, kind);
    let html = render_html(incident, incident_id, kind);
    Ok(builder.multipart(MultiPart::alternative_plain_html(plain, html))?)
}

struct Totals {
    carga: i64,
    recuperado: i64,
    perdido: i64,
}

fn client_totals(incident: &Incident) -> Totals {
    let mut t = Totals { carga: 0, recuperado: 0, perdido: 0 };
    for c in &incident.clientes {
        t.carga += reais_to_centavos(c.valor_carga);
        t.recuperado += reais_to_centavos(c.valor_recuperado);
        t.perdido += reais_to_centavos(c.valor_perdido);
    }
    t
}

fn registro_line(incident: &Incident) -> String {
    incident
        .data_hora_registro
        .clone()
        .unwrap_or_else(|| Local::now().format("%d/%m/%Y %H:%M:%S").to_string())
}

/// Plain-text body, shared between the initial notice and the update (only
/// the header wording changes).
pub fn render_plain(incident: &Incident, incident_id: &str, kind: NotificationKind) -> String {
    let (title, registro_label) = match kind {
        NotificationKind::Cadastro => ("COMUNICADO DE INCIDENTE", "Data/Hora do Registro"),
        NotificationKind::Atualizacao => ("ATUALIZAÇÃO DE INCIDENTE", "Data/Hora da Atualização"),
    };
    let status = match kind {
        NotificationKind::Cadastro => "INCIDENTE REGISTRADO NO SISTEMA",
        NotificationKind::Atualizacao => "INCIDENTE ATUALIZADO NO SISTEMA",
    };

    let rule = "=".repeat(60);
    let sep = "-".repeat(40);
    let mut text = String::new();

    text.push_str(&format!("\n{rule}\n{title} - SISTEMA INCON\n{rule}\n\n"));
    text.push_str(&format!("⚠️  {status}\n\n"));

    text.push_str(&format!("IDENTIFICAÇÃO:\n{sep}\n"));
    text.push_str(&format!("Incidente LOGICS: {incident_id}\n"));
    text.push_str(&format!("{registro_label}: {}\n", registro_line(incident)));
    text.push_str(&format!(
        "Usuário Responsável: {}\n\n",
        fill(&incident.usuario_responsavel)
    ));

    text.push_str(&format!("📋 INFORMAÇÕES DO INCIDENTE:\n{sep}\n"));
    text.push_str(&format!("• Nº Viagem BENNER: {}\n", fill(&incident.n_benner)));
    text.push_str(&format!("• Nº SM: {}\n", fill(&incident.n_sm)));
    text.push_str(&format!("• Nº Ocorrência: {}\n", fill(&incident.ocorrencia)));
    text.push_str(&format!("• Tipo de Incidente: {}\n", fill(&incident.tipo_incidente)));
    text.push_str(&format!("• Data do Incidente: {}\n", fill(&incident.data_incidente)));
    text.push_str(&format!("• Hora do Incidente: {}\n", fill(&incident.hora_incidente)));
    text.push_str(&format!("• Período do Dia: {}\n\n", fill(&incident.periodo_incidente)));

    text.push_str(&format!("📍 LOCALIZAÇÃO:\n{sep}\n"));
    text.push_str(&format!("• Região: {}\n", fill(&incident.regiao)));
    text.push_str(&format!("• Estado: {}\n", fill(&incident.estado)));
    text.push_str(&format!("• Cidade: {}\n", fill(&incident.cidade)));
    text.push_str(&format!("• Local (Rua/Rodovia): {}\n", fill(&incident.endereco)));
    text.push_str(&format!("• Estrada/Urbana: {}\n", fill(&incident.estrada_urbana)));
    text.push_str(&format!(
        "• Coordenadas: Lat {}, Long {}\n\n",
        fill(&incident.latitude),
        fill(&incident.longitude)
    ));

    text.push_str(&format!("🚚 DADOS DE TRANSPORTE:\n{sep}\n"));
    text.push_str(&format!("• Transportador: {}\n", fill(&incident.transportador)));
    text.push_str(&format!("• Fase Transporte: {}\n", fill(&incident.fase_transporte)));
    text.push_str(&format!("• Placa Cavalo: {}\n", fill(&incident.placa_cavalo)));
    text.push_str(&format!("• Placa Baú: {}\n", fill(&incident.placa_bau)));
    text.push_str(&format!("• CPF Motorista: {}\n", fill(&incident.cpf_motorista)));
    text.push_str(&format!("• Rastreado Por: {}\n", fill(&incident.rastreado_por)));
    text.push_str(&format!("• Tracking Cell: {}\n\n", fill(&incident.tracking_cell)));

    text.push_str(&format!("⚠️  DETALHES OPERACIONAIS:\n{sep}\n"));
    text.push_str(&format!("• Falha RM: {}\n", fill(&incident.falha_rm)));
    text.push_str(&format!("• Local Caminhão: {}\n", fill(&incident.end_caminhao)));
    text.push_str(&format!("• Local Carga: {}\n", fill(&incident.end_carga)));
    text.push_str(&format!("• Origem: {}\n", fill(&incident.origem)));
    text.push_str(&format!("• Destino: {}\n", fill(&incident.destino)));

    if !incident.clientes.is_empty() {
        text.push_str(&format!("\n💼 CLIENTES E VALORES ENVOLVIDOS:\n{sep}\n"));
        for (i, cliente) in incident.clientes.iter().enumerate() {
            text.push_str(&format!(
                "\n{}. {}\n",
                i + 1,
                fill(&cliente.cliente)
            ));
            text.push_str(&format!("   Setor: {}\n", fill(&cliente.setor)));
            text.push_str(&format!(
                "   Valor Carga: {}\n",
                format_brl(reais_to_centavos(cliente.valor_carga))
            ));
            text.push_str(&format!(
                "   Valor Recuperado: {}\n",
                format_brl(reais_to_centavos(cliente.valor_recuperado))
            ));
            text.push_str(&format!(
                "   Valor Perdido: {}\n",
                format_brl(reais_to_centavos(cliente.valor_perdido))
            ));
        }

        let totals = client_totals(incident);
        text.push_str("\nTOTAIS:\n");
        text.push_str(&format!("• Valor Total Carga: {}\n", format_brl(totals.carga)));
        text.push_str(&format!(
            "• Valor Total Recuperado: {}\n",
            format_brl(totals.recuperado)
        ));
        text.push_str(&format!("• Valor Total Perdido: {}\n", format_brl(totals.perdido)));
    }

    text.push_str(&format!("\n📝 DESCRIÇÃO DO INCIDENTE:\n{sep}\n"));
    text.push_str(fill(&incident.descricao));
    text.push('\n');

    text.push_str(&format!("\n{rule}\n"));
    text.push_str("Email gerado automaticamente pelo Sistema INCON\n");
    text.push_str("Para mais informações, acesse o sistema de gestão de incidentes.\n");
    text.push_str(&format!("{rule}\n"));

    text
}

/// HTML alternative with the same sections as the plain body.
pub fn render_html(incident: &Incident, incident_id: &str, kind: NotificationKind) -> String {
    let (title, registro_label) = match kind {
        NotificationKind::Cadastro => ("Comunicado de Incidente", "Data/Hora do Registro"),
        NotificationKind::Atualizacao => ("Atualização de Incidente", "Data/Hora da Atualização"),
    };

    let row = |label: &str, value: &Option<String>| {
        format!(
            "<tr><td style=\"padding:2px 8px; color:#555;\">{}</td>\
             <td style=\"padding:2px 8px;\"><b>{}</b></td></tr>",
            html_escape(label),
            html_escape(fill(value))
        )
    };
    let section = |name: &str, rows: String| {
        format!(
            "<h3 style=\"border-bottom:1px solid #ccc; padding-bottom:4px; \
             color:#b30000;\">{}</h3><table style=\"font-size:13px;\">{rows}</table>",
            html_escape(name)
        )
    };

    let mut body = String::new();
    body.push_str(&format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 640px;\">\
         <h2 style=\"background:#b30000; color:white; padding:10px;\">{} - SISTEMA INCON</h2>\
         <p><b>Incidente LOGICS:</b> {}<br><b>{}:</b> {}<br>\
         <b>Usuário Responsável:</b> {}</p>",
        html_escape(title),
        html_escape(incident_id),
        html_escape(registro_label),
        html_escape(&registro_line(incident)),
        html_escape(fill(&incident.usuario_responsavel)),
    ));

    body.push_str(&section(
        "Informações do Incidente",
        [
            row("Nº Viagem BENNER", &incident.n_benner),
            row("Nº SM", &incident.n_sm),
            row("Nº Ocorrência", &incident.ocorrencia),
            row("Tipo de Incidente", &incident.tipo_incidente),
            row("Data do Incidente", &incident.data_incidente),
            row("Hora do Incidente", &incident.hora_incidente),
            row("Período do Dia", &incident.periodo_incidente),
        ]
        .join(""),
    ));

    body.push_str(&section(
        "Localização",
        [
            row("Região", &incident.regiao),
            row("Estado", &incident.estado),
            row("Cidade", &incident.cidade),
            row("Local (Rua/Rodovia)", &incident.endereco),
            row("Estrada/Urbana", &incident.estrada_urbana),
            row("Latitude", &incident.latitude),
            row("Longitude", &incident.longitude),
        ]
        .join(""),
    ));

    body.push_str(&section(
        "Dados de Transporte",
        [
            row("Transportador", &incident.transportador),
            row("Fase Transporte", &incident.fase_transporte),
            row("Placa Cavalo", &incident.placa_cavalo),
            row("Placa Baú", &incident.placa_bau),
            row("CPF Motorista", &incident.cpf_motorista),
            row("Rastreado Por", &incident.rastreado_por),
            row("Tracking Cell", &incident.tracking_cell),
        ]
        .join(""),
    ));

    body.push_str(&section(
        "Detalhes Operacionais",
        [
            row("Falha RM", &incident.falha_rm),
            row("Local Caminhão", &incident.end_caminhao),
            row("Local Carga", &incident.end_carga),
            row("Origem", &incident.origem),
            row("Destino", &incident.destino),
        ]
        .join(""),
    ));

    if !incident.clientes.is_empty() {
        let mut rows = String::from(
            "<tr style=\"background:#eee;\"><th style=\"padding:4px 8px;\">Cliente</th>\
             <th style=\"padding:4px 8px;\">Setor</th>\
             <th style=\"padding:4px 8px;\">Carga</th>\
             <th style=\"padding:4px 8px;\">Recuperado</th>\
             <th style=\"padding:4px 8px;\">Perdido</th></tr>",
        );
        for c in &incident.clientes {
            rows.push_str(&format!(
                "<tr><td style=\"padding:2px 8px;\">{}</td>\
                 <td style=\"padding:2px 8px;\">{}</td>\
                 <td style=\"padding:2px 8px;\">{}</td>\
                 <td style=\"padding:2px 8px;\">{}</td>\
                 <td style=\"padding:2px 8px;\">{}</td></tr>",
                html_escape(fill(&c.cliente)),
                html_escape(fill(&c.setor)),
                format_brl(reais_to_centavos(c.valor_carga)),
                format_brl(reais_to_centavos(c.valor_recuperado)),
                format_brl(reais_to_centavos(c.valor_perdido)),
            ));
        }
        let totals = client_totals(incident);
        rows.push_str(&format!(
            "<tr style=\"font-weight:bold;\"><td style=\"padding:2px 8px;\" colspan=\"2\">TOTAIS</td>\
             <td style=\"padding:2px 8px;\">{}</td>\
             <td style=\"padding:2px 8px;\">{}</td>\
             <td style=\"padding:2px 8px;\">{}</td></tr>",
            format_brl(totals.carga),
            format_brl(totals.recuperado),
            format_brl(totals.perdido),
        ));
        body.push_str(&format!(
            "<h3 style=\"border-bottom:1px solid #ccc; padding-bottom:4px; color:#b30000;\">\
             Clientes e Valores Envolvidos</h3><table style=\"font-size:13px; \
             border-collapse:collapse;\">{rows}</table>"
        ));
    }

    body.push_str(&format!(
        "<h3 style=\"border-bottom:1px solid #ccc; padding-bottom:4px; color:#b30000;\">\
         Descrição do Incidente</h3><p>{}</p>",
        html_escape(fill(&incident.descricao))
    ));

    body.push_str(
        "<hr><p style=\"font-size:11px; color:#888;\">Email gerado automaticamente pelo \
         Sistema INCON. Para mais informações, acesse o sistema de gestão de incidentes.</p></div>",
    );

    body
}
