//! Customer entity and its business rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::Document;

/// Customer address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endereco {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rua: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complemento: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bairro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
}

impl Endereco {
    pub fn new(
        rua: impl Into<String>,
        numero: impl Into<String>,
        cidade: impl Into<String>,
        estado: impl Into<String>,
        cep: impl Into<String>,
    ) -> Self {
        Self {
            rua: Some(rua.into()),
            numero: Some(numero.into()),
            cidade: Some(cidade.into()),
            estado: Some(estado.into()),
            cep: Some(cep.into()),
            ..Default::default()
        }
    }

    /// Street, number, city, state and CEP are all filled in.
    pub fn is_completo(&self) -> bool {
        [&self.rua, &self.numero, &self.cidade, &self.estado, &self.cep]
            .iter()
            .all(|f| f.as_deref().map_or(false, |s| !s.is_empty()))
    }

    pub fn is_cep_valido(&self) -> bool {
        self.cep
            .as_deref()
            .map_or(false, |c| c.len() == 8 && c.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Two uppercase ASCII letters.
    pub fn is_estado_valido(&self) -> bool {
        self.estado
            .as_deref()
            .map_or(false, |e| e.len() == 2 && e.bytes().all(|b| b.is_ascii_uppercase()))
    }

    /// CEP as `XXXXX-XXX`; an invalid CEP is returned unchanged.
    pub fn formatar_cep(&self) -> Option<String> {
        let cep = self.cep.as_deref()?;
        if self.is_cep_valido() {
            Some(format!("{}-{}", &cep[..5], &cep[5..]))
        } else {
            Some(cep.to_string())
        }
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        let fields = [
            ("rua", &self.rua),
            ("numero", &self.numero),
            ("complemento", &self.complemento),
            ("bairro", &self.bairro),
            ("cidade", &self.cidade),
            ("estado", &self.estado),
            ("cep", &self.cep),
        ];
        for (name, value) in fields {
            if let Some(v) = value {
                doc.insert(name, v.as_str());
            }
        }
        doc
    }
}

/// Customer metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canal: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
    /// Set while the customer is deactivated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_desativacao: Option<DateTime<Utc>>,
}

impl Metadata {
    pub fn new(origem: impl Into<String>, canal: impl Into<String>) -> Self {
        Self {
            origem: Some(origem.into()),
            canal: Some(canal.into()),
            ..Default::default()
        }
    }

    /// Adds a tag unless already present.
    pub fn adicionar_tag(&mut self, tag: &str) {
        if !self.has_tag(tag) {
            self.tags.push(tag.to_string());
        }
    }

    pub fn remover_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_desativado(&self) -> bool {
        self.data_desativacao.is_some()
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        if let Some(origem) = &self.origem {
            doc.insert("origem", origem.as_str());
        }
        if let Some(canal) = &self.canal {
            doc.insert("canal", canal.as_str());
        }
        doc.insert("tags", self.tags.clone());
        if let Some(notas) = &self.notas {
            doc.insert("notas", notas.as_str());
        }
        if let Some(when) = self.data_desativacao {
            doc.insert("dataDesativacao", when);
        }
        doc
    }
}

/// A customer of the `clientes` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub cliente_id: String,
    pub nome_cliente: String,
    pub email_cliente: String,
    pub cpf_cliente: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endereco: Option<Endereco>,
    pub ativo: bool,
    pub data_cadastro: DateTime<Utc>,
    pub data_ultima_atualizacao: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versao: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Cliente {
    /// New active customer with a fresh UUID and both timestamps set to now.
    pub fn new(
        nome_cliente: impl Into<String>,
        email_cliente: impl Into<String>,
        cpf_cliente: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            cliente_id: Uuid::new_v4().to_string(),
            nome_cliente: nome_cliente.into(),
            email_cliente: email_cliente.into(),
            cpf_cliente: cpf_cliente.into(),
            telefone: None,
            endereco: None,
            ativo: true,
            data_cadastro: now,
            data_ultima_atualizacao: now,
            versao: None,
            metadata: None,
        }
    }

    pub fn touch(&mut self) {
        self.data_ultima_atualizacao = Utc::now();
    }

    /// Soft delete: marks inactive and records when.
    pub fn desativar(&mut self) {
        self.ativo = false;
        self.metadata.get_or_insert_with(Metadata::default).data_desativacao = Some(Utc::now());
        self.touch();
    }

    pub fn reativar(&mut self) {
        self.ativo = true;
        if let Some(metadata) = &mut self.metadata {
            metadata.data_desativacao = None;
        }
        self.touch();
    }

    pub fn is_ativo(&self) -> bool {
        self.ativo
    }

    /// Exactly 11 ASCII digits.
    pub fn is_cpf_valido(&self) -> bool {
        self.cpf_cliente.len() == 11 && self.cpf_cliente.bytes().all(|b| b.is_ascii_digit())
    }

    /// A non-empty local part, `@`, and a non-empty domain.
    pub fn is_email_valido(&self) -> bool {
        match self.email_cliente.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && local
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || "+_.-".contains(c))
            }
            None => false,
        }
    }

    pub fn is_valido(&self) -> bool {
        !self.nome_cliente.is_empty() && self.is_cpf_valido() && self.is_email_valido()
    }

    pub fn adicionar_tag(&mut self, tag: &str) {
        self.metadata
            .get_or_insert_with(Metadata::default)
            .adicionar_tag(tag);
    }

    pub fn remover_tag(&mut self, tag: &str) {
        if let Some(metadata) = &mut self.metadata {
            metadata.remover_tag(tag);
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata.as_ref().map_or(false, |m| m.has_tag(tag))
    }

    /// The document stored in `clientes`, fields in schema order.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new()
            .with("clienteId", self.cliente_id.as_str())
            .with("nomeCliente", self.nome_cliente.as_str())
            .with("emailCliente", self.email_cliente.as_str())
            .with("cpfCliente", self.cpf_cliente.as_str());
        if let Some(telefone) = &self.telefone {
            doc.insert("telefone", telefone.as_str());
        }
        if let Some(endereco) = &self.endereco {
            doc.insert("endereco", endereco.to_document());
        }
        doc.insert("ativo", self.ativo);
        doc.insert("dataCadastro", self.data_cadastro);
        doc.insert("dataUltimaAtualizacao", self.data_ultima_atualizacao);
        if let Some(versao) = self.versao {
            doc.insert("versao", versao);
        }
        if let Some(metadata) = &self.metadata {
            doc.insert("metadata", metadata.to_document());
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maria() -> Cliente {
        Cliente::new("Maria Silva", "maria@example.com", "12345678901")
    }

    #[test]
    fn test_new_cliente_defaults() {
        let c = maria();
        assert!(c.is_ativo());
        assert_eq!(c.data_cadastro, c.data_ultima_atualizacao);
        assert!(Uuid::parse_str(&c.cliente_id).is_ok());
        assert_eq!(c.cliente_id, c.cliente_id.to_lowercase());
        assert!(c.is_valido());
    }

    #[test]
    fn test_desativar_and_reativar() {
        let mut c = maria();
        c.desativar();
        assert!(!c.is_ativo());
        assert!(c.metadata.as_ref().unwrap().is_desativado());

        c.reativar();
        assert!(c.is_ativo());
        assert!(!c.metadata.as_ref().unwrap().is_desativado());
    }

    #[test]
    fn test_tags_without_duplicates() {
        let mut c = maria();
        c.adicionar_tag("vip");
        c.adicionar_tag("vip");
        c.adicionar_tag("b2b");
        assert_eq!(c.metadata.as_ref().unwrap().tags, vec!["vip", "b2b"]);

        c.remover_tag("vip");
        assert!(!c.has_tag("vip"));
        assert!(c.has_tag("b2b"));
    }

    #[test]
    fn test_cpf_and_email_rules() {
        let mut c = maria();
        c.cpf_cliente = "1234567890a".into();
        assert!(!c.is_cpf_valido());

        c = maria();
        c.email_cliente = "maria.example.com".into();
        assert!(!c.is_email_valido());
        c.email_cliente = "@example.com".into();
        assert!(!c.is_email_valido());
        assert!(!c.is_valido());
    }

    #[test]
    fn test_endereco_rules() {
        let endereco = Endereco::new("Rua A", "10", "São Paulo", "SP", "01001000");
        assert!(endereco.is_completo());
        assert!(endereco.is_cep_valido());
        assert!(endereco.is_estado_valido());
        assert_eq!(endereco.formatar_cep().as_deref(), Some("01001-000"));

        let partial = Endereco {
            estado: Some("sp".into()),
            cep: Some("0100".into()),
            ..Default::default()
        };
        assert!(!partial.is_completo());
        assert!(!partial.is_estado_valido());
        assert_eq!(partial.formatar_cep().as_deref(), Some("0100"));
    }

    #[test]
    fn test_to_document_omits_absent_fields() {
        let doc = maria().to_document();
        let keys: Vec<_> = doc.keys().collect();
        assert_eq!(
            keys,
            vec![
                "clienteId",
                "nomeCliente",
                "emailCliente",
                "cpfCliente",
                "ativo",
                "dataCadastro",
                "dataUltimaAtualizacao",
            ]
        );
        assert_eq!(doc.get("dataCadastro").unwrap().type_name(), "date");
    }

    #[test]
    fn test_serde_camel_case() {
        let json = serde_json::to_value(maria()).unwrap();
        assert_eq!(json["nomeCliente"], "Maria Silva");
        assert!(json.get("telefone").is_none());

        let back: Cliente = serde_json::from_value(json).unwrap();
        assert_eq!(back.cpf_cliente, "12345678901");
    }
}
