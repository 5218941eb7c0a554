//! Report catalog.
//!
//! Reports are plain data: an identifier, a display title and the SQL text.
//! The built-in catalog covers the sales database (`usuario`, `produto`,
//! `pedido`, `itens_pedido`); more reports can be appended from the config
//! file without touching the executor or renderer.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named SQL query plus its display title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Identifier typed at the menu prompt or passed to `--report`.
    pub id: String,

    /// Human-readable title, without the identifier.
    pub title: String,

    /// Complete SQL statement.
    pub sql: String,
}

impl Report {
    /// Creates a report entry.
    pub fn new(id: impl Into<String>, title: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            sql: sql.into(),
        }
    }

    /// Title as shown in the menu and above the table: `"<id>. <title>"`.
    pub fn heading(&self) -> String {
        format!("{}. {}", self.id, self.title)
    }
}

/// Ordered registry of reports with unique identifiers.
#[derive(Debug, Clone)]
pub struct ReportCatalog {
    reports: Vec<Report>,
}

impl ReportCatalog {
    /// Returns the built-in sales reports, identified `1` through `15`.
    pub fn builtin() -> Self {
        let reports = BUILTIN_REPORTS
            .iter()
            .enumerate()
            .map(|(i, (title, sql))| Report::new((i + 1).to_string(), *title, *sql))
            .collect();
        Self { reports }
    }

    /// Returns the built-in catalog extended with `custom` reports.
    ///
    /// Fails if a custom report has a blank field or reuses an identifier.
    pub fn with_custom(custom: Vec<Report>) -> Result<Self> {
        let mut catalog = Self::builtin();
        let mut ids: HashSet<String> = catalog.reports.iter().map(|r| r.id.clone()).collect();

        for report in custom {
            if report.id.trim().is_empty()
                || report.title.trim().is_empty()
                || report.sql.trim().is_empty()
            {
                return Err(ReportError::config(
                    "Custom reports need a non-empty id, title and sql",
                ));
            }
            // "0" is reserved for leaving the menu.
            if report.id.trim() == "0" || !ids.insert(report.id.trim().to_string()) {
                return Err(ReportError::config(format!(
                    "Duplicate or reserved report id '{}'",
                    report.id
                )));
            }
            catalog.reports.push(Report {
                id: report.id.trim().to_string(),
                ..report
            });
        }

        Ok(catalog)
    }

    /// Looks up a report by identifier.
    pub fn get(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id.trim())
    }

    /// Iterates over the reports in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Report> {
        self.reports.iter()
    }

    /// Number of reports in the catalog.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Returns true if the catalog holds no reports.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

const BUILTIN_REPORTS: &[(&str, &str)] = &[
    (
        "Active Users",
        r#"
        SELECT id_usuario, nome, email, telefone
        FROM usuario
        WHERE ativo = TRUE
        ORDER BY nome;
        "#,
    ),
    (
        "Product Catalog by Category",
        r#"
        SELECT categoria, nome, preco, quantidade_estoque
        FROM produto
        WHERE ativo = TRUE
        ORDER BY categoria, nome;
        "#,
    ),
    (
        "Order Count by Status",
        r#"
        SELECT status_pedido, COUNT(*) AS quantidade_pedidos
        FROM pedido
        GROUP BY status_pedido
        ORDER BY quantidade_pedidos DESC;
        "#,
    ),
    (
        "Low Stock Alert (fewer than 20 units)",
        r#"
        SELECT nome, categoria, quantidade_estoque, preco
        FROM produto
        WHERE quantidade_estoque < 20 AND ativo = TRUE
        ORDER BY quantidade_estoque ASC;
        "#,
    ),
    (
        "Recent Orders (last 30 days)",
        r#"
        SELECT p.id_pedido, u.nome AS cliente, p.data_pedido, p.status_pedido, p.valor_total
        FROM pedido p
        JOIN usuario u ON p.id_usuario = u.id_usuario
        WHERE p.data_pedido >= CURRENT_DATE - INTERVAL '30 days'
        ORDER BY p.data_pedido DESC;
        "#,
    ),
    (
        "Most Expensive Product per Category",
        r#"
        SELECT categoria, nome, preco
        FROM produto p1
        WHERE preco = (
            SELECT MAX(preco)
            FROM produto p2
            WHERE p2.categoria = p1.categoria AND p2.ativo = TRUE
        ) AND ativo = TRUE
        ORDER BY categoria;
        "#,
    ),
    (
        "Customers with Incomplete Contact Data",
        r#"
        SELECT id_usuario, nome, email, telefone, endereco
        FROM usuario
        WHERE (telefone IS NULL OR telefone = '')
           OR (endereco IS NULL OR endereco = '')
        AND ativo = TRUE
        ORDER BY nome;
        "#,
    ),
    (
        "Orders Pending Delivery",
        r#"
        SELECT p.id_pedido, u.nome AS cliente, p.data_pedido, p.status_pedido,
               p.valor_total, p.endereco_entrega
        FROM pedido p
        JOIN usuario u ON p.id_usuario = u.id_usuario
        WHERE p.status_pedido IN ('pendente', 'confirmado', 'processando', 'enviado')
        ORDER BY p.data_pedido;
        "#,
    ),
    (
        "Full Order Detail",
        r#"
        SELECT p.id_pedido, u.nome AS cliente, u.email, p.data_pedido, p.status_pedido,
               pr.nome AS produto, ip.quantidade, ip.preco_unitario, ip.subtotal
        FROM pedido p
        JOIN usuario u ON p.id_usuario = u.id_usuario
        JOIN itens_pedido ip ON p.id_pedido = ip.id_pedido
        JOIN produto pr ON ip.id_produto = pr.id_produto
        ORDER BY p.id_pedido, pr.nome;
        "#,
    ),
    (
        "Best-Selling Products Ranking",
        r#"
        SELECT pr.nome, pr.categoria, SUM(ip.quantidade) AS total_vendido,
               SUM(ip.subtotal) AS receita_total
        FROM produto pr
        JOIN itens_pedido ip ON pr.id_produto = ip.id_produto
        GROUP BY pr.id_produto, pr.nome, pr.categoria
        ORDER BY total_vendido DESC, receita_total DESC;
        "#,
    ),
    (
        "Customers Without Purchases",
        r#"
        SELECT u.id_usuario, u.nome, u.email, u.telefone, u.data_cadastro
        FROM usuario u
        LEFT JOIN pedido p ON u.id_usuario = p.id_usuario
        WHERE p.id_usuario IS NULL AND u.ativo = TRUE
        ORDER BY u.data_cadastro DESC;
        "#,
    ),
    (
        "Purchase Statistics per Customer",
        r#"
        SELECT u.nome, u.email,
               COUNT(p.id_pedido) AS total_pedidos,
               COALESCE(SUM(p.valor_total), 0) AS total_gasto,
               COALESCE(AVG(p.valor_total), 0) AS ticket_medio
        FROM usuario u
        LEFT JOIN pedido p ON u.id_usuario = p.id_usuario
        WHERE u.ativo = TRUE
        GROUP BY u.id_usuario, u.nome, u.email
        ORDER BY total_gasto DESC;
        "#,
    ),
    (
        "Monthly Sales Report",
        r#"
        SELECT EXTRACT(YEAR FROM data_pedido) AS ano,
               EXTRACT(MONTH FROM data_pedido) AS mes,
               COUNT(*) AS total_pedidos,
               SUM(valor_total) AS receita_total,
               AVG(valor_total) AS ticket_medio
        FROM pedido
        WHERE status_pedido NOT IN ('cancelado')
        GROUP BY EXTRACT(YEAR FROM data_pedido), EXTRACT(MONTH FROM data_pedido)
        ORDER BY ano DESC, mes DESC;
        "#,
    ),
    (
        "Products Never Sold",
        r#"
        SELECT pr.id_produto, pr.nome, pr.categoria, pr.preco, pr.quantidade_estoque
        FROM produto pr
        LEFT JOIN itens_pedido ip ON pr.id_produto = ip.id_produto
        WHERE ip.id_produto IS NULL AND pr.ativo = TRUE
        ORDER BY pr.categoria, pr.nome;
        "#,
    ),
    (
        "Average Ticket by Category",
        r#"
        SELECT pr.categoria,
               COUNT(DISTINCT p.id_pedido) AS total_pedidos,
               SUM(ip.subtotal) AS receita_total,
               AVG(ip.subtotal) AS ticket_medio_item,
               SUM(ip.quantidade) AS total_itens_vendidos
        FROM produto pr
        JOIN itens_pedido ip ON pr.id_produto = ip.id_produto
        JOIN pedido p ON ip.id_pedido = p.id_pedido
        WHERE p.status_pedido NOT IN ('cancelado')
        GROUP BY pr.categoria
        ORDER BY receita_total DESC;
        "#,
    ),
];
