use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::labelled_enum;

labelled_enum! {
    /// Business sector of a company or a job post.
    pub enum Industry {
        AdviceAuditAccounting => "Advice, audit, accounting",
        AeronauticsNaval => "Aeronautics, naval",
        AgricultureFishingAquaculture => "Agriculture, fishing, aquaculture",
        AirportShippingServices => "Airport and shipping services",
        AssociativeActivities => "Associative activities",
        BankingInsuranceFinance => "Banking, insurance, finance",
        CallCentersHotlines => "Call centers, hotlines",
        ChemistryPetrochemistryMining => "Chemistry, petrochemistry, raw materials, mining",
        CleaningSecuritySurveillance => "Cleaning, security, surveillance",
        ConsumerGoods => "Consumer goods",
        DistributionSellingWholesale => "Distribution, selling, wholesale",
        EditionPrinting => "Edition, printing",
        EducationTraining => "Education, training",
        ElectricElectronicOpticalPrecision => "Electric, electronic, optical and precision equipments",
        ElectricityWaterGasEnergy => "Electricity, water, gas, nuclear, energy",
        EngineeringDevelopmentStudies => "Engineering, development studies",
        EnvironmentRecycling => "Environment, recycling",
        EventReceptionist => "Event, receptionist",
        FoodProcessingIndustry => "Food-processing industry",
        FurnishingDecoration => "Furnishing, decoration",
        GovernmentServices => "Government services",
        GreenwaysForestsHunting => "Greenways, forests, hunting",
        Handling => "Handling",
        HealthPharmacyHospitals => "Health, pharmacy, hospitals, medical equipment",
        HotelBusinessCatering => "Hotel business, catering",
        ImportExportBusiness => "Import-export business",
        IndustryProductionManufacturing => "Industry, production, manufacturing and other",
        ItSoftwareEngineeringInternet => "IT, software engineering, Internet",
        LuxuryCosmetics => "Luxury, cosmetics",
        MaintenanceServicingAfterSales => "Maintenance, servicing, after-sales services",
        MarketingCommunicationMedia => "Marketing, communication, media",
        MechanicalEquipmentMachines => "Mechanical equipment, machines",
        MetallurgySteelIndustry => "Metallurgy, steel industry",
        MotorTransportationEquipment => "Motor, transportation equipment, reparation",
        PaperWoodRubberPlasticGlass => "Paper, wood, rubber, plastic, glass, tobacco",
        PharmaceuticalIndustry => "Pharmaceutical industry",
        PublicBuildingsConstruction => "Public buildings and works sector, construction",
        QualityMethods => "Quality, methods",
        RealEstateArchitecture => "Real-estate, architecture, town planning",
        Rental => "Rental",
        ResearchDevelopment => "Research and development",
        SecretarialWork => "Secretarial work",
        ServicesOther => "Services other",
        SocialPublicHumanServices => "Social, public and human services",
        SportsCulturalSocialAction => "Sports, cultural and social action",
        Telecom => "Telecom",
        TemporaryWorkRecruitment => "Temporary work, recruitment",
        TextileLeatherClothing => "Textile, leather, shoes, clothing industry",
        TourismLeisure => "Tourism, leisure activities",
        TransportLogisticsPostal => "Transport, logistics, postal services",
    }
}

/// Company profile, one-to-one with an employer `User` via `employer_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployerProfile {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub company_name: String,
    pub address: String,
    pub zip_code: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub company_industry: Vec<Industry>,
    /// Headcount. Bucketed into size ranges by the employer insights report.
    pub number_of_employees: Option<i64>,
    pub company_description: String,
    pub position_in_organization: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmployerProfileCreate {
    pub company_name: String,
    pub address: String,
    pub zip_code: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub company_industry: Vec<Industry>,
    pub number_of_employees: Option<i64>,
    pub company_description: String,
    pub position_in_organization: String,
}

impl EmployerProfileCreate {
    pub fn into_profile(self, employer_id: Uuid) -> EmployerProfile {
        EmployerProfile {
            id: Uuid::new_v4(),
            employer_id,
            company_name: self.company_name,
            address: self.address,
            zip_code: self.zip_code,
            city: self.city,
            country: self.country,
            company_industry: self.company_industry,
            number_of_employees: self.number_of_employees,
            company_description: self.company_description,
            position_in_organization: self.position_in_organization,
            created_at: Utc::now(),
        }
    }
}

/// Partial update: only fields present in the request body are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployerProfileUpdate {
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub company_industry: Option<Vec<Industry>>,
    pub number_of_employees: Option<i64>,
    pub company_description: Option<String>,
    pub position_in_organization: Option<String>,
}

impl EmployerProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.address.is_none()
            && self.zip_code.is_none()
            && self.city.is_none()
            && self.country.is_none()
            && self.company_industry.is_none()
            && self.number_of_employees.is_none()
            && self.company_description.is_none()
            && self.position_in_organization.is_none()
    }

    pub fn apply_to(self, profile: &mut EmployerProfile) {
        if let Some(v) = self.company_name {
            profile.company_name = v;
        }
        if let Some(v) = self.address {
            profile.address = v;
        }
        if let Some(v) = self.zip_code {
            profile.zip_code = v;
        }
        if let Some(v) = self.city {
            profile.city = v;
        }
        if let Some(v) = self.country {
            profile.country = v;
        }
        if let Some(v) = self.company_industry {
            profile.company_industry = v;
        }
        if let Some(v) = self.number_of_employees {
            profile.number_of_employees = Some(v);
        }
        if let Some(v) = self.company_description {
            profile.company_description = v;
        }
        if let Some(v) = self.position_in_organization {
            profile.position_in_organization = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_profile() -> EmployerProfile {
        EmployerProfileCreate {
            company_name: "Umurage Ltd".to_string(),
            address: "KN 5 Rd".to_string(),
            zip_code: "00000".to_string(),
            city: "Kigali".to_string(),
            country: "Rwanda".to_string(),
            company_industry: vec![Industry::Telecom],
            number_of_employees: Some(42),
            company_description: "Connectivity".to_string(),
            position_in_organization: "HR Lead".to_string(),
        }
        .into_profile(Uuid::new_v4())
    }

    #[test]
    fn test_update_only_touches_present_fields() {
        let mut profile = make_profile();
        let update: EmployerProfileUpdate =
            serde_json::from_str(r#"{"city":"Musanze","number_of_employees":120}"#).unwrap();
        update.apply_to(&mut profile);
        assert_eq!(profile.city, "Musanze");
        assert_eq!(profile.number_of_employees, Some(120));
        assert_eq!(profile.company_name, "Umurage Ltd");
        assert_eq!(profile.company_industry, vec![Industry::Telecom]);
    }

    #[test]
    fn test_empty_update_detected() {
        let update: EmployerProfileUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_industry_count() {
        assert_eq!(Industry::ALL.len(), 50);
        assert_eq!(
            Industry::ItSoftwareEngineeringInternet.as_str(),
            "IT, software engineering, Internet"
        );
    }
}
