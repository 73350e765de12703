//! Built-in entity families. Each family is a self-contained rule script;
//! its entry rules produce the entity tags, the rest are helpers.

use rockwell_protocol::NerFlags;

#[derive(Debug)]
pub struct Family {
    pub flag: NerFlags,
    pub name: &'static str,
    pub script: &'static str,
    pub entries: &'static [&'static str],
}

const DATES: &str = r"
@lemma:january,february,march,april,may,june,july,august,september,october,november,december | month
@rule:month ; @type:number ; @word+optional:\, ; @type:number | date
@type:number ; @rule:month ; @word+optional:\, ; @type:number | day-month-date
@rule:month ; @type:number | month-date
";

const CURRENCIES: &str = "@role:currency | currency";
const PERCENTAGES: &str = "@role:percentage | percentage";
const QUANTITIES: &str = "@role:quantity | quantity";
const NUMBERS: &str = "@role:number | number";

const ORGANIZATIONS: &str = r"
@word:inc,corp,ltd,co,llc,plc,gmbh | company-suffix
@pos+repeat:NNP ; @rule:company-suffix | company
";

const PERSONS: &str = r"
@word:mr,mrs,ms,dr,prof ; @word+optional:. | title
@rule+prefix:title ; @pos+lemma+repeat:NNP+!january,february,march,april,may,june,july,august,september,october,november,december,inc,corp,ltd | titled-person
@pos+lemma:NNP+!january,february,march,april,may,june,july,august,september,october,november,december,mr,mrs,ms,dr,prof ; @pos+lemma+repeat:NNP+!january,february,march,april,may,june,july,august,september,october,november,december,inc,corp,ltd | full-name
";

/// Every family, highest priority first.
pub const FAMILIES: &[Family] = &[
    Family {
        flag: NerFlags::DATES,
        name: "dates",
        script: DATES,
        entries: &["date", "day-month-date", "month-date"],
    },
    Family {
        flag: NerFlags::CURRENCIES,
        name: "currencies",
        script: CURRENCIES,
        entries: &["currency"],
    },
    Family {
        flag: NerFlags::PERCENTAGES,
        name: "percentages",
        script: PERCENTAGES,
        entries: &["percentage"],
    },
    Family {
        flag: NerFlags::QUANTITIES,
        name: "quantities",
        script: QUANTITIES,
        entries: &["quantity"],
    },
    Family {
        flag: NerFlags::NUMBERS,
        name: "numbers",
        script: NUMBERS,
        entries: &["number"],
    },
    Family {
        flag: NerFlags::ORGANIZATIONS,
        name: "organizations",
        script: ORGANIZATIONS,
        entries: &["company"],
    },
    Family {
        flag: NerFlags::PERSONS,
        name: "persons",
        script: PERSONS,
        entries: &["titled-person", "full-name"],
    },
];

/// The families enabled by `flags`, in priority order.
pub fn enabled(flags: NerFlags) -> impl Iterator<Item = &'static Family> {
    FAMILIES.iter().filter(move |family| flags.contains(family.flag))
}
