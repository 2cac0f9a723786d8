use chrono::NaiveDate;
use fatura::config::{fatura_to_json, load_client, load_orders, load_tax_table};
use fatura::core::*;
use fatura::demonstrativo::render_statement;
use fatura::fatura::FaturaBuilder;

const TABLE: &str = r#"{
    "impostosMunicipais": { "pecas": { "ir": 2 }, "servicos": { "ir": 5 } },
    "retencoesOrgao": { "percentual": "4.8" }
}"#;

const CLIENT: &str = r#"{
    "id": "C-1",
    "nome": "Prefeitura Municipal",
    "tipoImposto": ["municipais", "retencoes"],
    "tipoTaxa": "operacao"
}"#;

const ORDERS: &str = r#"[
    {
        "codigo": "OS-1", "numeroOS": "1001", "clienteId": "C-1",
        "fornecedor": { "id": "F-1", "nome": "Oficina Central", "naoOptanteSimples": true },
        "valorPecas": "1000", "valorServico": "500",
        "descontoPecasPerc": "10", "descontoServicoPerc": "10",
        "valorPecasComDesconto": "900", "valorServicoComDesconto": "450",
        "valorFinal": "1350", "status": "Autorizada"
    }
]"#;

fn main() {
    let table = load_tax_table(TABLE).unwrap();
    let client = load_client(CLIENT).unwrap();
    let orders = load_orders(ORDERS).unwrap();

    let fatura = FaturaBuilder::new(
        "FC-2024-0001",
        Direction::Client,
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    )
    .client(&client)
    .tax_table(&table)
    .due_date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
    .orders(orders)
    .build()
    .unwrap();

    println!("{}", render_statement(&fatura));
    println!("{}", fatura_to_json(&fatura).unwrap());
}
