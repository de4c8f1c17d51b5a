//! Sample notices shaped like real gazette publications.

/// Extract where a lapsed concession is replaced by a newly measured one.
pub const EXTRACT_WITH_REPLACEMENT: &str = r#"Boletín Oficial de Minería | Lunes 2 de febrero de 2026

EXTRACTO
2° Juzgado de Letras de Copiapó, causa Rol V-1234-2025. Por resolución de fecha 16 de enero de 2026 se ordenó publicar el presente extracto.
Solicitante: MINERA ATACAMA SpA, R.U.T. 76.123.456-7, domiciliada en Copiapó, en presentación ingresada el 10 de diciembre de 2025, solicitó la caducidad de la concesión de explotación denominada "LA ROSA 1 AL 20", comuna de Tierra Amarilla, superficie 200 hectáreas, cuyos vértices son:
V1   Norte 7.012.345,00   Este 456.789,00
V2   Norte 7.012.345,00   Este 458.789,00
V3   Norte 7.011.345,00   Este 458.789,00

En su reemplazo se constituye la nueva concesión denominada “LA ROSA NUEVA 1 AL 10”, Rol V-2222-2025, solicitante PEDRO ROJAS DÍAZ, cédula 9.876.543-2, con una superficie de 100 hectáreas, cuyo punto medio tiene coordenadas Norte 7.020.000 Este 460.000.
CVE 2345678"#;

/// Survey request with a full vertex table.
pub const MENSURA_WITH_TABLE: &str = r#"SOLICITUD DE MENSURA
Juzgado de Letras de Vallenar, Rol: 567-2024
MARÍA ELENA SOTO, R.U.T. 12.345.678-5, domiciliada en Vallenar, solicita la mensura de la pertenencia "CERRO NEGRO 1 AL 5", comuna de Alto del Carmen, presentada con fecha veintidós de junio de dos mil veinticinco. Superficie: 50 hectáreas.
Coordenadas U.T.M. de los vértices:
V1  6.820.000,00  350.000,00
V2  6.820.000,00  350.500,00
V3  6.819.000,00  350.500,00
V4  6.819.000,00  350.000,00"#;

/// Manifestation that only gives a reference point and no area.
pub const MANIFESTATION_WITH_REFERENCE_POINT: &str = r#"MANIFESTACIÓN MINERA
Juzgado de Letras de Diego de Almagro, Rol 89-2025. Don Luis Alberto Pérez Vega, cédula 10.111.222-3, domiciliado en Chañaral, manifiesta la concesión denominada "ESTRELLA DEL SUR", ubicada en la comuna de Chañaral, cuyo P.M. tiene coordenadas U.T.M. Norte 7.085.000 Este 345.000."#;
