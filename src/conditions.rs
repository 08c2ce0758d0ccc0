//! Static educational content for the supported skin conditions

use std::collections::HashMap;

use crate::types::ConditionInfo;

/// Read-only lookup table keyed by lowercase condition name
pub struct ConditionCatalog {
    conditions: HashMap<String, ConditionInfo>,
}

impl ConditionCatalog {
    /// The four conditions shipped with the service
    pub fn builtin() -> Self {
        let conditions = [rosacea(), acne(), manchas(), lunares()]
            .into_iter()
            .map(|info| (info.name.clone(), info))
            .collect();

        Self { conditions }
    }

    /// Case-insensitive exact lookup
    pub fn get(&self, name: &str) -> Option<&ConditionInfo> {
        self.conditions.get(&name.to_lowercase())
    }

    /// Condition names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.conditions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ConditionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn rosacea() -> ConditionInfo {
    ConditionInfo {
        name: "rosacea".into(),
        title: "Rosácea".into(),
        description: "La rosácea es una afección crónica que causa enrojecimiento y vasos sanguíneos visibles en la cara, a veces con pequeños bultos rojos llenos de pus.".into(),
        causes: strings(&[
            "Predisposición genética",
            "Problemas con los vasos sanguíneos faciales",
            "Ácaros microscópicos (Demodex)",
            "Bacterias intestinales (H. pylori)",
            "Desencadenantes ambientales",
        ]),
        symptoms: strings(&[
            "Enrojecimiento persistente en el centro de la cara",
            "Vasos sanguíneos dilatados visibles",
            "Bultos rojos (pápulas) y pústulas",
            "Sensación de ardor o escozor",
            "Piel sensible y reactiva",
            "Engrosamiento de la piel nasal (rinofima)",
        ]),
        treatment: strings(&[
            "Medicamentos tópicos (metronidazol, ácido azelaico)",
            "Antibióticos orales",
            "Isotretinoína (casos severos)",
            "Terapias con láser o luz pulsada",
            "Evitar desencadenantes conocidos",
        ]),
        prevention: strings(&[
            "Usar protector solar diariamente",
            "Evitar extremos de temperatura",
            "Evitar alimentos y bebidas desencadenantes",
            "Usar productos para piel sensible",
            "Mantener una buena rutina de cuidado facial",
        ]),
        image: "https://images.pexels.com/photos/1138531/pexels-photo-1138531.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1".into(),
    }
}

fn acne() -> ConditionInfo {
    ConditionInfo {
        name: "acne".into(),
        title: "Acné".into(),
        description: "El acné es una condición común que ocurre cuando los folículos pilosos se obstruyen con grasa y células muertas de la piel, causando granos y espinillas.".into(),
        causes: strings(&[
            "Cambios hormonales",
            "Exceso de producción de grasa (sebo)",
            "Bacterias",
            "Ciertos medicamentos",
            "Estrés",
        ]),
        symptoms: strings(&[
            "Puntos negros y blancos",
            "Espinillas",
            "Protuberancias rojas y dolorosas",
            "Quistes",
            "Cicatrices",
        ]),
        treatment: strings(&[
            "Limpieza suave de la piel",
            "Medicamentos tópicos (peróxido de benzoilo, retinoides)",
            "Antibióticos",
            "Terapias hormonales",
            "Evitar manipular las lesiones",
        ]),
        prevention: strings(&[
            "Lavar el rostro regularmente",
            "Evitar productos grasos",
            "No exprimir los granos",
            "Mantener el cabello limpio",
            "Usar protector solar no comedogénico",
        ]),
        image: "https://images.pexels.com/photos/10004287/pexels-photo-10004287.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1".into(),
    }
}

fn manchas() -> ConditionInfo {
    ConditionInfo {
        name: "manchas".into(),
        title: "Manchas Solares".into(),
        description: "Las manchas solares son áreas de la piel que se oscurecen debido a la exposición prolongada al sol, también conocidas como lentigos solares.".into(),
        causes: strings(&[
            "Exposición excesiva a la radiación UV",
            "Envejecimiento de la piel",
            "Predisposición genética",
        ]),
        symptoms: strings(&[
            "Manchas planas y marrones",
            "Aparición en zonas expuestas al sol",
            "No suelen causar dolor ni molestias",
        ]),
        treatment: strings(&[
            "Cremas despigmentantes",
            "Tratamientos con láser",
            "Peelings químicos",
            "Crioterapia",
            "Protección solar diaria",
        ]),
        prevention: strings(&[
            "Evitar la exposición solar prolongada",
            "Usar protector solar de amplio espectro",
            "Utilizar ropa protectora",
            "Evitar camas solares",
            "Revisar la piel regularmente",
        ]),
        image: "https://images.pexels.com/photos/7479603/pexels-photo-7479603.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1".into(),
    }
}

fn lunares() -> ConditionInfo {
    ConditionInfo {
        name: "lunares".into(),
        title: "Lunares".into(),
        description: "Los lunares son áreas pequeñas de pigmentación en la piel, generalmente inofensivas, pero algunos pueden evolucionar y requerir control dermatológico.".into(),
        causes: strings(&[
            "Acumulación de melanocitos",
            "Factores genéticos",
            "Exposición solar",
        ]),
        symptoms: strings(&[
            "Pequeñas manchas marrones o negras",
            "Pueden ser planas o elevadas",
            "Cambios en el color, tamaño o forma pueden ser signo de alerta",
        ]),
        treatment: strings(&[
            "Observación regular",
            "Extirpación quirúrgica si es necesario",
            "Biopsia en caso de sospecha de malignidad",
            "Evitar la exposición solar excesiva",
            "Consulta dermatológica ante cambios sospechosos",
        ]),
        prevention: strings(&[
            "Usar protector solar",
            "Evitar la exposición solar intensa",
            "Autoexamen de la piel",
            "Consultar al dermatólogo ante cambios",
            "No manipular los lunares",
        ]),
        image: "https://images.pexels.com/photos/8058606/pexels-photo-8058606.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1".into(),
    }
}
