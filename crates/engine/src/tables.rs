use model::descriptor::{SelectFilter, TableDescriptor};

const RECENCY: SelectFilter = SelectFilter::Recency {
    created_at: "EKLEMEZAMANI",
    modified_at: "DEGISTIRMEZAMANI",
};

/// The main table set in its declared order. Order matters: stock cards
/// reference the category and quality tables, the design hierarchy builds on
/// stock cards, and work orders come last.
pub fn main_tables() -> Vec<TableDescriptor> {
    vec![
        TableDescriptor {
            label: "Companies",
            table: "FIRMALAR",
            primary_key: "FIRMAID",
            filter: RECENCY,
        },
        TableDescriptor {
            label: "Personnel",
            table: "PERSONEL",
            primary_key: "PERSONELID",
            filter: RECENCY,
        },
        TableDescriptor {
            label: "Stock categories",
            table: "STOKKATEGORI",
            primary_key: "STOKKATEGORIID",
            filter: RECENCY,
        },
        TableDescriptor {
            label: "Stock qualities",
            table: "STOKKALITE",
            primary_key: "STOKKALITEID",
            filter: RECENCY,
        },
        TableDescriptor {
            label: "Stock cards",
            table: "STOKKARTI",
            primary_key: "STOKKARTIID",
            filter: RECENCY,
        },
        TableDescriptor {
            label: "Design cards",
            table: "DESENKARTI",
            primary_key: "DESENKARTIID",
            filter: RECENCY,
        },
        TableDescriptor {
            label: "Design variants",
            table: "DESENVARYANTI",
            primary_key: "DESENVARYANTIID",
            filter: RECENCY,
        },
        TableDescriptor {
            label: "Design yarns",
            table: "DESENIPLIKLERI",
            primary_key: "DESENIPLIKLERIID",
            filter: RECENCY,
        },
        TableDescriptor {
            label: "Routing",
            table: "ROTALAMA",
            primary_key: "ROTALAMAID",
            filter: RECENCY,
        },
        TableDescriptor {
            label: "Quality control",
            table: "KALITEKONTROL",
            primary_key: "KALITEKONTROLID",
            filter: RECENCY,
        },
        TableDescriptor {
            label: "UH records",
            table: "UH",
            primary_key: "UHID",
            filter: RECENCY,
        },
        TableDescriptor {
            label: "MS records",
            table: "MS",
            primary_key: "MSID",
            filter: RECENCY,
        },
        TableDescriptor {
            label: "Work orders",
            table: "ISEMRI",
            primary_key: "ISEMRIID",
            filter: RECENCY,
        },
    ]
}

/// The bulk stock table, replicated on its own slower schedule. It follows
/// the same recency window as the main set; only its size and run cadence
/// set it apart.
pub fn bulk_tables() -> Vec<TableDescriptor> {
    vec![TableDescriptor {
        label: "Stocks",
        table: "STOKLAR",
        primary_key: "STOKID",
        filter: RECENCY,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_table_uses_the_shared_recency_window() {
        let stoklar = &bulk_tables()[0];
        assert_eq!(stoklar.table, "STOKLAR");
        assert_eq!(stoklar.primary_key, "STOKID");
        assert_eq!(stoklar.filter, RECENCY);
    }

    #[test]
    fn bulk_table_is_not_part_of_the_main_set() {
        let main: Vec<&str> = main_tables().iter().map(|d| d.table).collect();
        for bulk in bulk_tables() {
            assert!(!main.contains(&bulk.table));
        }
    }

    #[test]
    fn referenced_tables_precede_their_dependents() {
        let order: Vec<&str> = main_tables().iter().map(|d| d.table).collect();
        let pos = |t: &str| order.iter().position(|x| *x == t).unwrap();
        assert!(pos("STOKKATEGORI") < pos("STOKKARTI"));
        assert!(pos("STOKKALITE") < pos("STOKKARTI"));
        assert!(pos("STOKKARTI") < pos("DESENKARTI"));
        assert!(pos("DESENKARTI") < pos("DESENVARYANTI"));
    }
}
