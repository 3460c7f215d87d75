//! Localized entity-name fragments
//!
//! The printer integration names its sensors in the user's language, and the
//! registry turns those names into ids by lowercasing and transliterating
//! them. Each [`LanguagePack`] lists, for one language, the id fragment the
//! registry produces for every concept SpoolSync recognizes.
//!
//! Adding a language means adding one record to [`LANGUAGES`]. Nothing else
//! changes: the pattern builders iterate this table.

/// Entity-id fragments for one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguagePack {
    /// Language code
    pub code: &'static str,
    /// Print status sensor (`sensor.<prefix>_<fragment>`)
    pub print_status: &'static str,
    /// AMS humidity sensor (`sensor.<prefix>_ams_<n>_<fragment>`)
    pub ams_humidity: &'static str,
    /// AMS tray sensor (`sensor.<prefix>_ams_<n>_<fragment>_<tray>`)
    pub tray: &'static str,
    /// External spool sensor
    pub external_spool: &'static str,
    /// Current stage sensor
    pub current_stage: &'static str,
    /// Print weight sensor
    pub print_weight: &'static str,
    /// Print progress sensor
    pub print_progress: &'static str,
    /// Friendly-name suffix of the status sensor, as displayed (not normalized)
    pub status_label: &'static str,
}

/// Every supported language, English first
pub const LANGUAGES: &[LanguagePack] = &[
    LanguagePack {
        code: "en",
        print_status: "print_status",
        ams_humidity: "humidity",
        tray: "tray",
        external_spool: "external_spool",
        current_stage: "current_stage",
        print_weight: "print_weight",
        print_progress: "print_progress",
        status_label: "Print Status",
    },
    LanguagePack {
        code: "de",
        print_status: "druckstatus",
        ams_humidity: "luftfeuchtigkeit",
        tray: "slot",
        external_spool: "externe_spule",
        current_stage: "aktueller_schritt",
        print_weight: "druckgewicht",
        print_progress: "druckfortschritt",
        status_label: "Druckstatus",
    },
    LanguagePack {
        code: "fr",
        print_status: "etat_de_l_impression",
        ams_humidity: "humidite",
        tray: "emplacement",
        external_spool: "bobine_externe",
        current_stage: "etape_actuelle",
        print_weight: "poids_de_l_impression",
        print_progress: "progression_de_l_impression",
        status_label: "État de l'impression",
    },
    LanguagePack {
        code: "es",
        print_status: "estado_de_impresion",
        ams_humidity: "humedad",
        tray: "bandeja",
        external_spool: "bobina_externa",
        current_stage: "etapa_actual",
        print_weight: "peso_de_impresion",
        print_progress: "progreso_de_impresion",
        status_label: "Estado de impresión",
    },
    LanguagePack {
        code: "it",
        print_status: "stato_di_stampa",
        ams_humidity: "umidita",
        tray: "vassoio",
        external_spool: "bobina_esterna",
        current_stage: "fase_attuale",
        print_weight: "peso_di_stampa",
        print_progress: "avanzamento_di_stampa",
        status_label: "Stato di stampa",
    },
    LanguagePack {
        code: "nl",
        print_status: "printstatus",
        ams_humidity: "luchtvochtigheid",
        tray: "lade",
        external_spool: "externe_spoel",
        current_stage: "huidige_fase",
        print_weight: "printgewicht",
        print_progress: "printvoortgang",
        status_label: "Printstatus",
    },
    LanguagePack {
        code: "pl",
        print_status: "status_drukowania",
        ams_humidity: "wilgotnosc",
        tray: "podajnik",
        external_spool: "szpula_zewnetrzna",
        current_stage: "biezacy_etap",
        print_weight: "waga_wydruku",
        print_progress: "postep_drukowania",
        status_label: "Status drukowania",
    },
    LanguagePack {
        code: "pt",
        print_status: "estado_da_impressao",
        ams_humidity: "umidade",
        tray: "bandeja",
        external_spool: "carretel_externo",
        current_stage: "etapa_atual",
        print_weight: "peso_da_impressao",
        print_progress: "progresso_da_impressao",
        status_label: "Estado da impressão",
    },
    LanguagePack {
        code: "cs",
        print_status: "stav_tisku",
        ams_humidity: "vlhkost",
        tray: "zasobnik",
        external_spool: "externi_civka",
        current_stage: "aktualni_faze",
        print_weight: "hmotnost_tisku",
        print_progress: "prubeh_tisku",
        status_label: "Stav tisku",
    },
    LanguagePack {
        code: "sv",
        print_status: "utskriftsstatus",
        ams_humidity: "luftfuktighet",
        tray: "fack",
        external_spool: "extern_spole",
        current_stage: "aktuellt_steg",
        print_weight: "utskriftsvikt",
        print_progress: "utskriftsforlopp",
        status_label: "Utskriftsstatus",
    },
    LanguagePack {
        code: "da",
        print_status: "printstatus",
        ams_humidity: "luftfugtighed",
        tray: "bakke",
        external_spool: "ekstern_spole",
        current_stage: "aktuelt_trin",
        print_weight: "printvaegt",
        print_progress: "printfremskridt",
        status_label: "Printstatus",
    },
    LanguagePack {
        code: "nb",
        print_status: "utskriftsstatus",
        ams_humidity: "luftfuktighet",
        tray: "skuff",
        external_spool: "ekstern_spole",
        current_stage: "gjeldende_trinn",
        print_weight: "utskriftsvekt",
        print_progress: "utskriftsfremdrift",
        status_label: "Utskriftsstatus",
    },
    LanguagePack {
        code: "hu",
        print_status: "nyomtatasi_allapot",
        ams_humidity: "paratartalom",
        tray: "talca",
        external_spool: "kulso_tekercs",
        current_stage: "aktualis_szakasz",
        print_weight: "nyomtatasi_suly",
        print_progress: "nyomtatasi_folyamat",
        status_label: "Nyomtatási állapot",
    },
    LanguagePack {
        code: "tr",
        print_status: "yazdirma_durumu",
        ams_humidity: "nem",
        tray: "tepsi",
        external_spool: "harici_makara",
        current_stage: "mevcut_asama",
        print_weight: "baski_agirligi",
        print_progress: "yazdirma_ilerlemesi",
        status_label: "Yazdırma durumu",
    },
    LanguagePack {
        code: "ru",
        print_status: "status_pechati",
        ams_humidity: "vlazhnost",
        tray: "lotok",
        external_spool: "vneshniaia_katushka",
        current_stage: "tekushchii_etap",
        print_weight: "ves_pechati",
        print_progress: "progress_pechati",
        status_label: "Статус печати",
    },
    LanguagePack {
        code: "uk",
        print_status: "status_druku",
        ams_humidity: "vologist",
        tray: "lotok",
        external_spool: "zovnishnia_kotushka",
        current_stage: "potochnii_etap",
        print_weight: "vaga_druku",
        print_progress: "progres_druku",
        status_label: "Статус друку",
    },
    LanguagePack {
        code: "zh",
        print_status: "da_yin_zhuang_tai",
        ams_humidity: "shi_du",
        tray: "liao_cao",
        external_spool: "wai_bu_liao_pan",
        current_stage: "dang_qian_jie_duan",
        print_weight: "da_yin_zhong_liang",
        print_progress: "da_yin_jin_du",
        status_label: "打印状态",
    },
];
